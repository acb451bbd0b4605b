//! Wellness snapshot read model.
//!
//! A snapshot is ephemeral and fully derivable: losing every cached copy
//! costs a recompute, nothing more. It is safe to cache with a short TTL
//! as long as lifecycle mutations invalidate it synchronously.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::DimensionLevel;
use crate::domain::foundation::Timestamp;

/// Schema version stamped into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// How much trust a consumer should place in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotConfidence {
    Low,
    Medium,
    High,
}

/// One wellness dimension with its supporting evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDimension {
    /// Dimension key from the catalog, e.g. "depression".
    pub key: String,
    /// Coarse severity level for this dimension.
    pub level: DimensionLevel,
    /// Human-readable evidence, e.g. "PHQ-9:12/27".
    pub evidence: Vec<String>,
}

/// Compact per-user wellness summary derived from active assessments.
///
/// `assessments_used` always has one entry per dimension: every claim in
/// the snapshot is traceable to the instrument that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessSnapshot {
    /// When the snapshot was derived.
    pub as_of: Timestamp,
    /// Schema version (`SNAPSHOT_VERSION`).
    pub version: u32,
    /// One entry per contributing instrument, catalog order.
    pub dimensions: Vec<SnapshotDimension>,
    /// Overall trust level based on coverage and recency.
    pub confidence: SnapshotConfidence,
    /// Display names of the instruments that contributed.
    pub assessments_used: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot = WellnessSnapshot {
            as_of: Timestamp::now(),
            version: SNAPSHOT_VERSION,
            dimensions: vec![SnapshotDimension {
                key: "depression".to_string(),
                level: DimensionLevel::Moderate,
                evidence: vec!["PHQ-9:12/27".to_string()],
            }],
            confidence: SnapshotConfidence::Medium,
            assessments_used: vec!["PHQ-9".to_string()],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("asOf"));
        assert!(json.contains("assessmentsUsed"));
        assert!(json.contains("\"confidence\":\"medium\""));
        assert!(json.contains("PHQ-9:12/27"));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snapshot = WellnessSnapshot {
            as_of: Timestamp::now(),
            version: SNAPSHOT_VERSION,
            dimensions: vec![],
            confidence: SnapshotConfidence::Low,
            assessments_used: vec![],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: WellnessSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, restored);
    }
}
