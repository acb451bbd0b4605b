//! Pure snapshot derivation.
//!
//! No I/O, no clocks, no caches: records in, snapshot out. The handler
//! supplies `now` so derivation stays deterministic and testable.

use crate::domain::assessment::{latest_active_per_type, AssessmentRecord};
use crate::domain::catalog::AssessmentType;
use crate::domain::foundation::Timestamp;

use super::model::{SnapshotConfidence, SnapshotDimension, WellnessSnapshot, SNAPSHOT_VERSION};

/// Evidence older than this no longer supports any confidence.
pub const STALE_AFTER_DAYS: i64 = 90;

/// Evidence newer than this counts as fresh for high confidence.
pub const FRESH_WITHIN_DAYS: i64 = 30;

/// Minimum distinct dimensions required for high confidence.
pub const HIGH_CONFIDENCE_MIN_DIMENSIONS: usize = 4;

/// Derives a wellness snapshot from the user's records.
///
/// Only the most recent active record of each instrument contributes.
/// Returns None when no active records exist: "no snapshot available"
/// is a different statement than an empty snapshot.
pub fn derive_snapshot(records: &[AssessmentRecord], now: Timestamp) -> Option<WellnessSnapshot> {
    let latest = latest_active_per_type(records);
    if latest.is_empty() {
        return None;
    }

    let mut dimensions = Vec::new();
    let mut assessments_used = Vec::new();
    let mut all_stale = true;
    let mut all_fresh = true;

    for at in AssessmentType::all() {
        let record = match latest.get(at) {
            Some(r) => *r,
            None => continue,
        };

        let level = record
            .severity_band()
            .map(|band| band.dimension_level())
            .unwrap_or_else(|| at.fallback_level());

        dimensions.push(SnapshotDimension {
            key: at.dimension_key().to_string(),
            level,
            evidence: vec![format!(
                "{}:{}/{}",
                at.display_name(),
                record.score(),
                at.max_score()
            )],
        });
        assessments_used.push(at.display_name().to_string());

        if !is_older_than(record.taken_at(), &now, STALE_AFTER_DAYS) {
            all_stale = false;
        }
        if is_older_than(record.taken_at(), &now, FRESH_WITHIN_DAYS) {
            all_fresh = false;
        }
    }

    let confidence = if dimensions.len() < 2 || all_stale {
        SnapshotConfidence::Low
    } else if dimensions.len() >= HIGH_CONFIDENCE_MIN_DIMENSIONS && all_fresh {
        SnapshotConfidence::High
    } else {
        SnapshotConfidence::Medium
    };

    Some(WellnessSnapshot {
        as_of: now,
        version: SNAPSHOT_VERSION,
        dimensions,
        confidence,
        assessments_used,
    })
}

/// True when `taken_at` lies more than `days` before `now`.
fn is_older_than(taken_at: &Timestamp, now: &Timestamp, days: i64) -> bool {
    taken_at.plus_days(days).is_before(now)
}

#[cfg(test)]
#[path = "aggregator_test.rs"]
mod aggregator_test;
