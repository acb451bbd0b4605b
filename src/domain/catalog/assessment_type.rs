//! AssessmentType enum representing the fixed instrument catalog.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

use super::DimensionLevel;

/// The standardized self-report instruments the application administers.
///
/// Scoring happens upstream in the assessment-taking flow; this catalog
/// carries only the display metadata and score maxima needed for lifecycle
/// operations and snapshot evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    Depression,
    Anxiety,
    Stress,
    Wellbeing,
    Resilience,
    TraumaExposure,
}

/// Lookup table from wire codes and dimension keys to types.
static CODE_LOOKUP: Lazy<HashMap<&'static str, AssessmentType>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for at in AssessmentType::all() {
        map.insert(at.code(), *at);
        map.insert(at.dimension_key(), *at);
    }
    map
});

impl AssessmentType {
    /// Returns all assessment types in canonical order.
    pub fn all() -> &'static [AssessmentType] {
        &[
            AssessmentType::Depression,
            AssessmentType::Anxiety,
            AssessmentType::Stress,
            AssessmentType::Wellbeing,
            AssessmentType::Resilience,
            AssessmentType::TraumaExposure,
        ]
    }

    /// Returns the short instrument code used in URLs and storage.
    pub fn code(&self) -> &'static str {
        match self {
            AssessmentType::Depression => "phq9",
            AssessmentType::Anxiety => "gad7",
            AssessmentType::Stress => "pss10",
            AssessmentType::Wellbeing => "who5",
            AssessmentType::Resilience => "cdrisc10",
            AssessmentType::TraumaExposure => "pcl5",
        }
    }

    /// Returns the instrument's display name as shown to users and in
    /// snapshot evidence strings.
    pub fn display_name(&self) -> &'static str {
        match self {
            AssessmentType::Depression => "PHQ-9",
            AssessmentType::Anxiety => "GAD-7",
            AssessmentType::Stress => "PSS-10",
            AssessmentType::Wellbeing => "WHO-5",
            AssessmentType::Resilience => "CD-RISC-10",
            AssessmentType::TraumaExposure => "PCL-5",
        }
    }

    /// Returns the wellness dimension this instrument measures.
    pub fn dimension_key(&self) -> &'static str {
        match self {
            AssessmentType::Depression => "depression",
            AssessmentType::Anxiety => "anxiety",
            AssessmentType::Stress => "stress",
            AssessmentType::Wellbeing => "wellbeing",
            AssessmentType::Resilience => "resilience",
            AssessmentType::TraumaExposure => "trauma_exposure",
        }
    }

    /// Returns the maximum attainable raw score for this instrument.
    ///
    /// Evidence strings always cite this catalog maximum, never a
    /// per-record value.
    pub fn max_score(&self) -> i32 {
        match self {
            AssessmentType::Depression => 27,
            AssessmentType::Anxiety => 21,
            AssessmentType::Stress => 40,
            AssessmentType::Wellbeing => 25,
            AssessmentType::Resilience => 40,
            AssessmentType::TraumaExposure => 80,
        }
    }

    /// Returns the dimension level assumed when a stored severity band is
    /// missing or unrecognized.
    ///
    /// Symptom instruments default conservatively to Moderate; wellbeing
    /// and resilience instruments default to Low.
    pub fn fallback_level(&self) -> DimensionLevel {
        match self {
            AssessmentType::Depression
            | AssessmentType::Anxiety
            | AssessmentType::Stress
            | AssessmentType::TraumaExposure => DimensionLevel::Moderate,
            AssessmentType::Wellbeing | AssessmentType::Resilience => DimensionLevel::Low,
        }
    }

    /// Parses a wire code or dimension key into an assessment type.
    ///
    /// Returns a validation error for anything outside the catalog. Unknown
    /// types must be rejected before any storage mutation is attempted.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        CODE_LOOKUP
            .get(value.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "assessment_type",
                    format!("unknown assessment type '{}'", value),
                )
            })
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AssessmentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
