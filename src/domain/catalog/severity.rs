//! Severity bands and snapshot dimension levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical severity band assigned to a completed assessment by the
/// upstream scoring flow.
///
/// Stored alongside the raw score. Loading an unrecognized band yields
/// `None` rather than a failure; the snapshot aggregator substitutes the
/// instrument's fallback level in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Normal,
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl SeverityBand {
    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Normal => "normal",
            SeverityBand::Mild => "mild",
            SeverityBand::Moderate => "moderate",
            SeverityBand::Severe => "severe",
            SeverityBand::Critical => "critical",
        }
    }

    /// Parses a stored band, returning None for unrecognized values.
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(SeverityBand::Normal),
            "mild" => Some(SeverityBand::Mild),
            "moderate" => Some(SeverityBand::Moderate),
            "severe" => Some(SeverityBand::Severe),
            "critical" => Some(SeverityBand::Critical),
            _ => None,
        }
    }

    /// Maps this band onto the snapshot dimension level scale.
    pub fn dimension_level(&self) -> DimensionLevel {
        match self {
            SeverityBand::Normal => DimensionLevel::Low,
            SeverityBand::Mild => DimensionLevel::Mild,
            SeverityBand::Moderate => DimensionLevel::Moderate,
            SeverityBand::Severe | SeverityBand::Critical => DimensionLevel::High,
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse per-dimension level reported in a wellness snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionLevel {
    Low,
    Mild,
    Moderate,
    High,
}

impl DimensionLevel {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionLevel::Low => "low",
            DimensionLevel::Mild => "mild",
            DimensionLevel::Moderate => "moderate",
            DimensionLevel::High => "high",
        }
    }

    /// Parses a stored level, returning None for unrecognized values.
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "low" => Some(DimensionLevel::Low),
            "mild" => Some(DimensionLevel::Mild),
            "moderate" => Some(DimensionLevel::Moderate),
            "high" => Some(DimensionLevel::High),
            _ => None,
        }
    }

    /// Returns the numeric rank for ordering. Higher rank = more concern.
    pub fn rank(&self) -> u8 {
        match self {
            DimensionLevel::Low => 0,
            DimensionLevel::Mild => 1,
            DimensionLevel::Moderate => 2,
            DimensionLevel::High => 3,
        }
    }
}

impl fmt::Display for DimensionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
