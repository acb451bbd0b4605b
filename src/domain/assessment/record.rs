//! Assessment record aggregate entity.
//!
//! A record is one completed administration of a catalog instrument.
//! Records are append-only facts: score, responses, and taken_at never
//! change after completion. The only mutable aspect is the lifecycle
//! state, which moves through soft deletion, restoration, and permanent
//! deletion under the grace-period rules.

use crate::domain::catalog::{AssessmentType, SeverityBand};
use crate::domain::foundation::{
    AssessmentId, DomainError, ErrorCode, OwnedByUser, StateMachine, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// Days a soft-deleted record stays restorable before the sweeper may
/// purge it.
pub const GRACE_PERIOD_DAYS: i64 = 30;

/// Maximum length for a record title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Lifecycle state of an assessment record.
///
/// Deletion markers live inside the soft-deleted variant, so an active
/// record with a leftover `deleted_at` is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifecycleState {
    /// Visible everywhere: summaries, snapshots, aggregates.
    Active,
    /// Hidden from evaluation but restorable within the grace period.
    SoftDeleted {
        deleted_at: Timestamp,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Gone for good. Terminal.
    PermanentlyDeleted,
}

impl LifecycleState {
    /// Returns the state discriminant for transition checks and storage.
    pub fn kind(&self) -> LifecycleStateKind {
        match self {
            LifecycleState::Active => LifecycleStateKind::Active,
            LifecycleState::SoftDeleted { .. } => LifecycleStateKind::SoftDeleted,
            LifecycleState::PermanentlyDeleted => LifecycleStateKind::PermanentlyDeleted,
        }
    }
}

/// Discriminant of `LifecycleState` used for transition validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStateKind {
    Active,
    SoftDeleted,
    PermanentlyDeleted,
}

impl LifecycleStateKind {
    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStateKind::Active => "active",
            LifecycleStateKind::SoftDeleted => "soft_deleted",
            LifecycleStateKind::PermanentlyDeleted => "permanently_deleted",
        }
    }

    /// Parses a stored state, returning None for unrecognized values.
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "active" => Some(LifecycleStateKind::Active),
            "soft_deleted" => Some(LifecycleStateKind::SoftDeleted),
            "permanently_deleted" => Some(LifecycleStateKind::PermanentlyDeleted),
            _ => None,
        }
    }
}

impl StateMachine for LifecycleStateKind {
    fn can_transition_to(&self, target: &Self) -> bool {
        use LifecycleStateKind::*;
        matches!(
            (self, target),
            (Active, SoftDeleted)
                | (Active, PermanentlyDeleted)
                | (SoftDeleted, Active)
                | (SoftDeleted, PermanentlyDeleted)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LifecycleStateKind::*;
        match self {
            Active => vec![SoftDeleted, PermanentlyDeleted],
            SoftDeleted => vec![Active, PermanentlyDeleted],
            PermanentlyDeleted => vec![],
        }
    }
}

/// One answered question within a completed assessment.
///
/// Opaque to the lifecycle: preserved byte-for-byte through soft delete
/// and restore, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: String,
    pub answer: i32,
}

/// Assessment record aggregate - one completed instrument administration.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `title` is 1-200 characters, non-empty
/// - `score` is within the instrument's catalog range
/// - `score`, `responses`, and `taken_at` are write-once
/// - Permanently deleted records accept no further transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    /// Unique identifier for this record.
    id: AssessmentId,

    /// User who completed the assessment.
    user_id: UserId,

    /// Which catalog instrument was administered.
    assessment_type: AssessmentType,

    /// Display title, e.g. "Depression Check-in".
    title: String,

    /// Raw instrument score assigned by the upstream scoring flow.
    score: i32,

    /// Severity band from scoring. None when the stored value was
    /// unrecognized; the snapshot aggregator falls back per instrument.
    severity_band: Option<SeverityBand>,

    /// Ordered question/answer pairs, opaque to this subsystem.
    responses: Vec<QuestionResponse>,

    /// Free-form scoring payload (description, recommendations, insights).
    structured_result: serde_json::Value,

    /// When the user completed the assessment. Write-once.
    taken_at: Timestamp,

    /// Current lifecycle state.
    lifecycle: LifecycleState,
}

impl AssessmentRecord {
    /// Create a new active record for a just-completed assessment.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty/too long or score is outside
    ///   the instrument's range
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AssessmentId,
        user_id: UserId,
        assessment_type: AssessmentType,
        title: String,
        score: i32,
        severity_band: Option<SeverityBand>,
        responses: Vec<QuestionResponse>,
        structured_result: serde_json::Value,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_score(assessment_type, score)?;

        Ok(Self {
            id,
            user_id,
            assessment_type,
            title,
            score,
            severity_band,
            responses,
            structured_result,
            taken_at: Timestamp::now(),
            lifecycle: LifecycleState::Active,
        })
    }

    /// Reconstitute a record from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AssessmentId,
        user_id: UserId,
        assessment_type: AssessmentType,
        title: String,
        score: i32,
        severity_band: Option<SeverityBand>,
        responses: Vec<QuestionResponse>,
        structured_result: serde_json::Value,
        taken_at: Timestamp,
        lifecycle: LifecycleState,
    ) -> Self {
        Self {
            id,
            user_id,
            assessment_type,
            title,
            score,
            severity_band,
            responses,
            structured_result,
            taken_at,
            lifecycle,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the record ID.
    pub fn id(&self) -> &AssessmentId {
        &self.id
    }

    /// Returns the owner's user ID.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the instrument type.
    pub fn assessment_type(&self) -> AssessmentType {
        self.assessment_type
    }

    /// Returns the record title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the raw score.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Returns the severity band, if the stored value was recognized.
    pub fn severity_band(&self) -> Option<SeverityBand> {
        self.severity_band
    }

    /// Returns the question responses.
    pub fn responses(&self) -> &[QuestionResponse] {
        &self.responses
    }

    /// Returns the structured scoring payload.
    pub fn structured_result(&self) -> &serde_json::Value {
        &self.structured_result
    }

    /// Returns when the assessment was completed.
    pub fn taken_at(&self) -> &Timestamp {
        &self.taken_at
    }

    /// Returns the full lifecycle state.
    pub fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    /// Returns the lifecycle state discriminant.
    pub fn state_kind(&self) -> LifecycleStateKind {
        self.lifecycle.kind()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle queries
    // ─────────────────────────────────────────────────────────────────────────

    /// True if the record participates in summaries and snapshots.
    pub fn is_active(&self) -> bool {
        matches!(self.lifecycle, LifecycleState::Active)
    }

    /// True if the record is hidden but potentially restorable.
    pub fn is_soft_deleted(&self) -> bool {
        matches!(self.lifecycle, LifecycleState::SoftDeleted { .. })
    }

    /// Returns when the record was soft-deleted, if it is.
    pub fn deleted_at(&self) -> Option<Timestamp> {
        match &self.lifecycle {
            LifecycleState::SoftDeleted { deleted_at, .. } => Some(*deleted_at),
            _ => None,
        }
    }

    /// Returns the recorded deletion reason, if any.
    pub fn deletion_reason(&self) -> Option<&str> {
        match &self.lifecycle {
            LifecycleState::SoftDeleted { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    /// Returns the last instant at which restoration is still allowed.
    pub fn restore_deadline(&self) -> Option<Timestamp> {
        self.deleted_at().map(|at| at.plus_days(GRACE_PERIOD_DAYS))
    }

    /// True if the record is soft-deleted and still within its grace period.
    pub fn can_restore(&self, now: &Timestamp) -> bool {
        match self.restore_deadline() {
            Some(deadline) => !deadline.is_before(now),
            None => false,
        }
    }

    /// Whole days of grace remaining, clamped at zero.
    ///
    /// None unless the record is soft-deleted.
    pub fn days_left_in_grace(&self, now: &Timestamp) -> Option<i64> {
        self.restore_deadline()
            .map(|deadline| deadline.duration_since(now).num_days().max(0))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Soft-delete the record, recording when and why.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the record is active
    pub fn soft_delete(&mut self, now: Timestamp, reason: Option<String>) -> Result<(), DomainError> {
        self.state_kind()
            .transition_to(LifecycleStateKind::SoftDeleted)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;

        self.lifecycle = LifecycleState::SoftDeleted {
            deleted_at: now,
            reason,
        };
        Ok(())
    }

    /// Restore a soft-deleted record to active.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the record is soft-deleted
    /// - `GracePeriodExpired` when the 30-day window has passed
    pub fn restore(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.state_kind()
            .transition_to(LifecycleStateKind::Active)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;

        if !self.can_restore(&now) {
            return Err(DomainError::new(
                ErrorCode::GracePeriodExpired,
                format!(
                    "Restore window of {} days has passed",
                    GRACE_PERIOD_DAYS
                ),
            )
            .with_detail("assessment_id", self.id.to_string()));
        }

        self.lifecycle = LifecycleState::Active;
        Ok(())
    }

    /// Mark the record permanently deleted. Terminal.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already permanently deleted
    pub fn mark_permanently_deleted(&mut self) -> Result<(), DomainError> {
        self.state_kind()
            .transition_to(LifecycleStateKind::PermanentlyDeleted)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;

        self.lifecycle = LifecycleState::PermanentlyDeleted;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates the record title.
    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if trimmed.len() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("Title must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }

    /// Validates the score against the instrument's catalog range.
    fn validate_score(assessment_type: AssessmentType, score: i32) -> Result<(), DomainError> {
        let max = assessment_type.max_score();
        if score < 0 || score > max {
            return Err(DomainError::validation(
                "score",
                format!(
                    "{} score must be between 0 and {}, got {}",
                    assessment_type.display_name(),
                    max,
                    score
                ),
            ));
        }
        Ok(())
    }
}

impl OwnedByUser for AssessmentRecord {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user_id() -> UserId {
        UserId::new("user-123".to_string()).unwrap()
    }

    fn test_record() -> AssessmentRecord {
        AssessmentRecord::new(
            AssessmentId::new(),
            test_user_id(),
            AssessmentType::Depression,
            "Depression Check-in".to_string(),
            12,
            Some(SeverityBand::Moderate),
            vec![QuestionResponse {
                question: "q1".to_string(),
                answer: 2,
            }],
            serde_json::json!({"description": "Moderate symptoms"}),
        )
        .unwrap()
    }

    // Construction tests

    #[test]
    fn new_record_is_active() {
        let record = test_record();
        assert!(record.is_active());
        assert_eq!(record.state_kind(), LifecycleStateKind::Active);
    }

    #[test]
    fn new_record_rejects_empty_title() {
        let result = AssessmentRecord::new(
            AssessmentId::new(),
            test_user_id(),
            AssessmentType::Anxiety,
            "  ".to_string(),
            5,
            None,
            vec![],
            serde_json::Value::Null,
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_record_rejects_score_above_instrument_max() {
        let result = AssessmentRecord::new(
            AssessmentId::new(),
            test_user_id(),
            AssessmentType::Anxiety,
            "Anxiety Check-in".to_string(),
            22,
            None,
            vec![],
            serde_json::Value::Null,
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_record_rejects_negative_score() {
        let result = AssessmentRecord::new(
            AssessmentId::new(),
            test_user_id(),
            AssessmentType::Stress,
            "Stress Check-in".to_string(),
            -1,
            None,
            vec![],
            serde_json::Value::Null,
        );
        assert!(result.is_err());
    }

    // State machine tests

    #[test]
    fn active_can_transition_to_soft_deleted_and_permanent() {
        let active = LifecycleStateKind::Active;
        assert!(active.can_transition_to(&LifecycleStateKind::SoftDeleted));
        assert!(active.can_transition_to(&LifecycleStateKind::PermanentlyDeleted));
    }

    #[test]
    fn soft_deleted_can_restore_or_purge() {
        let deleted = LifecycleStateKind::SoftDeleted;
        assert!(deleted.can_transition_to(&LifecycleStateKind::Active));
        assert!(deleted.can_transition_to(&LifecycleStateKind::PermanentlyDeleted));
    }

    #[test]
    fn permanently_deleted_is_terminal() {
        let gone = LifecycleStateKind::PermanentlyDeleted;
        assert!(gone.is_terminal());
        assert!(!gone.can_transition_to(&LifecycleStateKind::Active));
        assert!(!gone.can_transition_to(&LifecycleStateKind::SoftDeleted));
    }

    // Soft delete tests

    #[test]
    fn soft_delete_records_timestamp_and_reason() {
        let mut record = test_record();
        let now = Timestamp::now();
        record
            .soft_delete(now, Some("making space".to_string()))
            .unwrap();

        assert!(record.is_soft_deleted());
        assert_eq!(record.deleted_at(), Some(now));
        assert_eq!(record.deletion_reason(), Some("making space"));
    }

    #[test]
    fn soft_delete_twice_fails() {
        let mut record = test_record();
        record.soft_delete(Timestamp::now(), None).unwrap();
        let result = record.soft_delete(Timestamp::now(), None);
        assert!(result.is_err());
    }

    // Restore tests

    #[test]
    fn restore_within_grace_returns_to_active() {
        let mut record = test_record();
        let original = record.clone();
        record.soft_delete(Timestamp::now(), Some("oops".to_string())).unwrap();
        record.restore(Timestamp::now()).unwrap();

        // Everything except the lifecycle markers survives the round trip
        assert_eq!(record, original);
    }

    #[test]
    fn restore_after_grace_period_fails() {
        let mut record = test_record();
        let deleted_at = Timestamp::now().minus_days(GRACE_PERIOD_DAYS + 1);
        record.soft_delete(deleted_at, None).unwrap();

        let result = record.restore(Timestamp::now());
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::GracePeriodExpired);
        // Still soft-deleted, not corrupted
        assert!(record.is_soft_deleted());
    }

    #[test]
    fn restore_of_active_record_fails() {
        let mut record = test_record();
        assert!(record.restore(Timestamp::now()).is_err());
    }

    #[test]
    fn can_restore_true_just_inside_grace() {
        let mut record = test_record();
        let deleted_at = Timestamp::now().minus_days(GRACE_PERIOD_DAYS - 1);
        record.soft_delete(deleted_at, None).unwrap();
        assert!(record.can_restore(&Timestamp::now()));
    }

    #[test]
    fn can_restore_false_past_grace() {
        let mut record = test_record();
        let deleted_at = Timestamp::now().minus_days(GRACE_PERIOD_DAYS + 1);
        record.soft_delete(deleted_at, None).unwrap();
        assert!(!record.can_restore(&Timestamp::now()));
    }

    #[test]
    fn can_restore_false_for_active_record() {
        let record = test_record();
        assert!(!record.can_restore(&Timestamp::now()));
    }

    #[test]
    fn days_left_in_grace_counts_down() {
        let mut record = test_record();
        let deleted_at = Timestamp::now().minus_days(10);
        record.soft_delete(deleted_at, None).unwrap();

        let days_left = record.days_left_in_grace(&Timestamp::now()).unwrap();
        assert_eq!(days_left, GRACE_PERIOD_DAYS - 10);
    }

    #[test]
    fn days_left_in_grace_clamps_at_zero() {
        let mut record = test_record();
        let deleted_at = Timestamp::now().minus_days(GRACE_PERIOD_DAYS + 5);
        record.soft_delete(deleted_at, None).unwrap();

        assert_eq!(record.days_left_in_grace(&Timestamp::now()), Some(0));
    }

    // Permanent deletion tests

    #[test]
    fn permanent_deletion_from_active() {
        let mut record = test_record();
        record.mark_permanently_deleted().unwrap();
        assert_eq!(record.state_kind(), LifecycleStateKind::PermanentlyDeleted);
    }

    #[test]
    fn permanent_deletion_from_soft_deleted() {
        let mut record = test_record();
        record.soft_delete(Timestamp::now(), None).unwrap();
        record.mark_permanently_deleted().unwrap();
        assert_eq!(record.state_kind(), LifecycleStateKind::PermanentlyDeleted);
    }

    #[test]
    fn nothing_transitions_out_of_permanent_deletion() {
        let mut record = test_record();
        record.mark_permanently_deleted().unwrap();

        assert!(record.restore(Timestamp::now()).is_err());
        assert!(record.soft_delete(Timestamp::now(), None).is_err());
        assert!(record.mark_permanently_deleted().is_err());
    }

    // Ownership tests

    #[test]
    fn owner_check_uses_user_id() {
        let record = test_record();
        assert!(record.is_owner(&test_user_id()));
        let other = UserId::new("other-user".to_string()).unwrap();
        assert!(!record.is_owner(&other));
    }

    // Serialization tests

    #[test]
    fn lifecycle_state_serializes_tagged() {
        let state = LifecycleState::SoftDeleted {
            deleted_at: Timestamp::now(),
            reason: Some("cleanup".to_string()),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "soft_deleted");
        assert_eq!(json["reason"], "cleanup");
        assert!(json["deleted_at"].is_string());
    }

    #[test]
    fn lifecycle_state_active_has_no_markers() {
        let json = serde_json::to_value(LifecycleState::Active).unwrap();
        assert_eq!(json["state"], "active");
        assert!(json.get("deleted_at").is_none());
    }

    // Round-trip law: whatever the instrument, score, reason, or deletion
    // age inside the grace period, restore undoes soft_delete exactly.

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn soft_delete_then_restore_is_identity(
            type_index in 0usize..6,
            score_fraction in 0.0f64..=1.0,
            reason in proptest::option::of(".{0,40}"),
            days_deleted in 0i64..GRACE_PERIOD_DAYS,
        ) {
            let assessment_type = AssessmentType::all()[type_index];
            let score = (score_fraction * assessment_type.max_score() as f64) as i32;
            let original = AssessmentRecord::new(
                AssessmentId::new(),
                test_user_id(),
                assessment_type,
                format!("{} check-in", assessment_type.display_name()),
                score,
                None,
                vec![],
                serde_json::json!({"score": score}),
            )
            .unwrap();

            let mut record = original.clone();
            let now = Timestamp::now();
            record.soft_delete(now.minus_days(days_deleted), reason).unwrap();
            prop_assert!(record.is_soft_deleted());
            record.restore(now).unwrap();

            prop_assert_eq!(record, original);
        }
    }
}
