//! RestoreAssessment - Brings a soft-deleted assessment back inside the grace window.

use std::sync::Arc;

use tracing::debug;

use crate::domain::assessment::{
    AssessmentError, DeletionEvent, DeletionKind, GRACE_PERIOD_DAYS,
};
use crate::domain::catalog::AssessmentType;
use crate::domain::foundation::{CommandMetadata, Timestamp, UserId};
use crate::ports::{AssessmentStore, DeletionLog, ProfileStore, SnapshotCache};

use super::cascade::recompute_user_aggregates;

/// Command to restore the most recent soft-deleted assessment of a type.
#[derive(Debug, Clone)]
pub struct RestoreAssessmentCommand {
    pub user_id: UserId,
    pub assessment_type: String,
}

/// Query for whether a restore would currently succeed.
#[derive(Debug, Clone)]
pub struct CanRestoreQuery {
    pub user_id: UserId,
    pub assessment_type: String,
}

/// Outcome of a restore attempt.
#[derive(Debug, Clone)]
pub struct RestoreAssessmentResult {
    pub success: bool,
    pub restored_count: u32,
    pub message: String,
}

/// Handler for restoring soft-deleted assessments.
///
/// When retakes left several soft-deleted records of one type, only the
/// most recent by `taken_at` comes back; older ones stay soft-deleted.
pub struct RestoreAssessmentHandler {
    assessments: Arc<dyn AssessmentStore>,
    profiles: Arc<dyn ProfileStore>,
    deletion_log: Arc<dyn DeletionLog>,
    snapshot_cache: Arc<dyn SnapshotCache>,
}

impl RestoreAssessmentHandler {
    pub fn new(
        assessments: Arc<dyn AssessmentStore>,
        profiles: Arc<dyn ProfileStore>,
        deletion_log: Arc<dyn DeletionLog>,
        snapshot_cache: Arc<dyn SnapshotCache>,
    ) -> Self {
        Self {
            assessments,
            profiles,
            deletion_log,
            snapshot_cache,
        }
    }

    pub async fn handle(
        &self,
        cmd: RestoreAssessmentCommand,
        _metadata: CommandMetadata,
    ) -> Result<RestoreAssessmentResult, AssessmentError> {
        // 1. Unknown types are a validation error, not a silent no-op
        let assessment_type = AssessmentType::parse(&cmd.assessment_type)
            .map_err(|_| AssessmentError::unknown_type(cmd.assessment_type.clone()))?;

        let now = Timestamp::now();
        let records = self
            .assessments
            .find_by_user_and_type(&cmd.user_id, assessment_type)
            .await?;

        // 2. Recency is keyed on taken_at: the canonical instance wins
        let candidate = records
            .iter()
            .filter(|r| r.is_soft_deleted())
            .max_by_key(|r| *r.taken_at());
        let Some(candidate) = candidate else {
            return Ok(Self::not_found(assessment_type));
        };

        // 3. Eligibility is keyed on deleted_at
        if !candidate.can_restore(&now) {
            return Ok(RestoreAssessmentResult {
                success: false,
                restored_count: 0,
                message: format!(
                    "{} assessment is past the {}-day grace period",
                    assessment_type.display_name(),
                    GRACE_PERIOD_DAYS
                ),
            });
        }

        // 4. Conditional transition; a lost race fails cleanly
        let restored = self.assessments.restore(candidate.id()).await?;
        if !restored {
            return Ok(Self::not_found(assessment_type));
        }

        // 5. The record counts again, so derived state must catch up
        self.snapshot_cache.invalidate(&cmd.user_id).await?;
        recompute_user_aggregates(
            self.assessments.as_ref(),
            self.profiles.as_ref(),
            &cmd.user_id,
            now,
        )
        .await?;

        // 6. Audit trail
        let event = DeletionEvent::for_type(
            cmd.user_id.clone(),
            assessment_type,
            DeletionKind::Restore,
            None,
            1,
        );
        self.deletion_log.append(&event).await?;

        debug!(
            user_id = %cmd.user_id.as_str(),
            assessment_type = assessment_type.code(),
            "Assessment restored"
        );

        Ok(RestoreAssessmentResult {
            success: true,
            restored_count: 1,
            message: format!("{} assessment restored", assessment_type.display_name()),
        })
    }

    /// True iff any soft-deleted record of the type is still inside the
    /// grace window.
    pub async fn can_restore(&self, query: CanRestoreQuery) -> Result<bool, AssessmentError> {
        let assessment_type = AssessmentType::parse(&query.assessment_type)
            .map_err(|_| AssessmentError::unknown_type(query.assessment_type.clone()))?;

        let now = Timestamp::now();
        let records = self
            .assessments
            .find_by_user_and_type(&query.user_id, assessment_type)
            .await?;
        Ok(records
            .iter()
            .any(|r| r.is_soft_deleted() && r.can_restore(&now)))
    }

    fn not_found(assessment_type: AssessmentType) -> RestoreAssessmentResult {
        RestoreAssessmentResult {
            success: false,
            restored_count: 0,
            message: format!(
                "{} assessment not found in a restorable state",
                assessment_type.display_name()
            ),
        }
    }
}
