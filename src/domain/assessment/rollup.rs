//! Profile recomputation from the active record set.
//!
//! Pure functions: the cascade hands in the surviving active records and
//! stores whatever comes back. Only the most recent active record of each
//! instrument contributes, and soft-deleted records are invisible here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::catalog::{AssessmentType, DimensionLevel};
use crate::domain::foundation::Timestamp;

use super::profile::RiskLevel;
use super::record::AssessmentRecord;

/// One per-dimension row of the overall assessment rollup.
///
/// Overwritten wholesale on every recompute; no version history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRollup {
    pub dimension_key: String,
    pub level: DimensionLevel,
    pub score: i32,
    pub max_score: i32,
    pub computed_at: Timestamp,
}

/// Result of recomputing a user's derived aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecompute {
    pub risk_level: RiskLevel,
    pub primary_concerns: Vec<String>,
    pub recommended_approach: Option<String>,
    pub newest_taken_at: Option<Timestamp>,
    pub dimensions: Vec<DimensionRollup>,
}

/// Symptom instruments feed risk; wellbeing-style instruments do not.
fn is_symptom_dimension(assessment_type: AssessmentType) -> bool {
    matches!(
        assessment_type,
        AssessmentType::Depression
            | AssessmentType::Anxiety
            | AssessmentType::Stress
            | AssessmentType::TraumaExposure
    )
}

/// Recomputes profile fields and dimension rollups from active records.
///
/// Non-active records in the input are ignored, so callers may pass the
/// user's full record set without pre-filtering.
pub fn recompute_from_records(records: &[AssessmentRecord], now: Timestamp) -> ProfileRecompute {
    let latest = latest_active_per_type(records);

    let mut dimensions = Vec::new();
    let mut newest_taken_at: Option<Timestamp> = None;
    let mut any_high = false;
    let mut moderate_count = 0usize;
    let mut concerns: Vec<(u8, String)> = Vec::new();

    // Catalog order keeps rollup rows and concern ties deterministic
    for at in AssessmentType::all() {
        let record = match latest.get(at) {
            Some(r) => *r,
            None => continue,
        };

        let level = record
            .severity_band()
            .map(|band| band.dimension_level())
            .unwrap_or_else(|| at.fallback_level());

        dimensions.push(DimensionRollup {
            dimension_key: at.dimension_key().to_string(),
            level,
            score: record.score(),
            max_score: at.max_score(),
            computed_at: now,
        });

        newest_taken_at = match newest_taken_at {
            Some(existing) => Some(existing.max(*record.taken_at())),
            None => Some(*record.taken_at()),
        };

        if is_symptom_dimension(*at) {
            match level {
                DimensionLevel::High => {
                    any_high = true;
                    concerns.push((level.rank(), at.dimension_key().to_string()));
                }
                DimensionLevel::Moderate => {
                    moderate_count += 1;
                    concerns.push((level.rank(), at.dimension_key().to_string()));
                }
                DimensionLevel::Low | DimensionLevel::Mild => {}
            }
        }
    }

    let risk_level = if any_high {
        RiskLevel::High
    } else if moderate_count >= 2 {
        RiskLevel::Elevated
    } else if moderate_count == 1 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    // Worst dimensions first; stable sort preserves catalog order for ties
    concerns.sort_by(|a, b| b.0.cmp(&a.0));
    let primary_concerns: Vec<String> = concerns.into_iter().map(|(_, key)| key).collect();

    let recommended_approach = if dimensions.is_empty() {
        None
    } else {
        Some(
            match risk_level {
                RiskLevel::High => "clinical-referral",
                RiskLevel::Elevated => "structured-program",
                RiskLevel::Moderate => "guided-self-help",
                RiskLevel::Low => "self-guided",
            }
            .to_string(),
        )
    };

    ProfileRecompute {
        risk_level,
        primary_concerns,
        recommended_approach,
        newest_taken_at,
        dimensions,
    }
}

/// Picks the most recent active record of each instrument by `taken_at`.
pub fn latest_active_per_type(
    records: &[AssessmentRecord],
) -> HashMap<AssessmentType, &AssessmentRecord> {
    let mut latest: HashMap<AssessmentType, &AssessmentRecord> = HashMap::new();
    for record in records.iter().filter(|r| r.is_active()) {
        match latest.get(&record.assessment_type()) {
            Some(existing) if !record.taken_at().is_after(existing.taken_at()) => {}
            _ => {
                latest.insert(record.assessment_type(), record);
            }
        }
    }
    latest
}
