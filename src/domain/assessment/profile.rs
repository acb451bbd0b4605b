//! User assessment profile aggregate.
//!
//! One row per user, recomputed from the active record set whenever that
//! set changes. The profile is derived state: deleting it loses nothing
//! that cannot be rebuilt, but keeping it current is the cascade's job.

use crate::domain::foundation::{OwnedByUser, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall risk posture derived from the user's active assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

impl RiskLevel {
    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Elevated => "elevated",
            RiskLevel::High => "high",
        }
    }

    /// Parses a stored level, returning None for unrecognized values.
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "low" => Some(RiskLevel::Low),
            "moderate" => Some(RiskLevel::Moderate),
            "elevated" => Some(RiskLevel::Elevated),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-user aggregate profile.
///
/// # Invariants
///
/// - `last_assessed_at` never moves backwards except through `reset`
/// - All fields are derivable from the active record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAssessmentProfile {
    /// Owner of this profile.
    user_id: UserId,

    /// Completion time of the newest assessment ever observed active.
    last_assessed_at: Option<Timestamp>,

    /// Derived risk posture.
    risk_level: RiskLevel,

    /// Dimension keys currently at moderate concern or above, worst first.
    primary_concerns: Vec<String>,

    /// Suggested program track, when any active assessments exist.
    recommended_approach: Option<String>,

    /// When the profile was last recomputed.
    updated_at: Timestamp,
}

impl UserAssessmentProfile {
    /// Creates an empty profile for a user with no assessments.
    pub fn fresh(user_id: UserId) -> Self {
        Self {
            user_id,
            last_assessed_at: None,
            risk_level: RiskLevel::Low,
            primary_concerns: Vec::new(),
            recommended_approach: None,
            updated_at: Timestamp::now(),
        }
    }

    /// Reconstitute a profile from persistence (no validation).
    pub fn reconstitute(
        user_id: UserId,
        last_assessed_at: Option<Timestamp>,
        risk_level: RiskLevel,
        primary_concerns: Vec<String>,
        recommended_approach: Option<String>,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            last_assessed_at,
            risk_level,
            primary_concerns,
            recommended_approach,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the owner's user ID.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns when the user last completed an assessment.
    pub fn last_assessed_at(&self) -> Option<&Timestamp> {
        self.last_assessed_at.as_ref()
    }

    /// Returns the derived risk level.
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Returns the current primary concerns.
    pub fn primary_concerns(&self) -> &[String] {
        &self.primary_concerns
    }

    /// Returns the recommended program track.
    pub fn recommended_approach(&self) -> Option<&str> {
        self.recommended_approach.as_deref()
    }

    /// Returns when the profile was last recomputed.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies a recomputation over the current active record set.
    ///
    /// `last_assessed_at` only moves forward: a deletion that removes the
    /// newest record does not rewind the user's assessment history.
    pub fn apply_recompute(
        &mut self,
        risk_level: RiskLevel,
        primary_concerns: Vec<String>,
        recommended_approach: Option<String>,
        newest_taken_at: Option<Timestamp>,
    ) {
        self.risk_level = risk_level;
        self.primary_concerns = primary_concerns;
        self.recommended_approach = recommended_approach;
        self.last_assessed_at = match (self.last_assessed_at, newest_taken_at) {
            (Some(existing), Some(computed)) => Some(existing.max(computed)),
            (Some(existing), None) => Some(existing),
            (None, computed) => computed,
        };
        self.updated_at = Timestamp::now();
    }

    /// Clears the profile back to its fresh state after a full reset.
    ///
    /// The only path that may rewind `last_assessed_at`.
    pub fn reset(&mut self) {
        self.last_assessed_at = None;
        self.risk_level = RiskLevel::Low;
        self.primary_concerns.clear();
        self.recommended_approach = None;
        self.updated_at = Timestamp::now();
    }
}

impl OwnedByUser for UserAssessmentProfile {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}
