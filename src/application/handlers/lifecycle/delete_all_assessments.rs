//! DeleteAllAssessments - Bulk deletion across every assessment type.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::assessment::{
    AssessmentError, AssessmentRecord, DeletionEvent, DeletionKind, GRACE_PERIOD_DAYS,
};
use crate::domain::foundation::{CommandMetadata, Timestamp, UserId};
use crate::ports::{AssessmentStore, DeletionLog, ProfileStore, SnapshotCache};

use super::cascade::{recompute_user_aggregates, reset_user_aggregates};

/// Confirmation phrase required for a bulk soft delete.
const BULK_DELETE_CONFIRMATION: &str = "DELETE ALL MY ASSESSMENTS";

/// Command to delete every assessment record a user has.
#[derive(Debug, Clone)]
pub struct DeleteAllAssessmentsCommand {
    pub user_id: UserId,
    /// Purge instead of soft delete. Irreversible.
    pub permanent: bool,
    pub reason: Option<String>,
    /// Required on the soft path; the permanent flag is explicit enough.
    pub confirmation: Option<String>,
}

/// Outcome of a bulk deletion.
///
/// On a partial failure `success` is `false` and `affected_count` is the
/// true number of records transitioned before the failure; callers must
/// inspect the count, not just the flag.
#[derive(Debug, Clone)]
pub struct DeleteAllAssessmentsResult {
    pub success: bool,
    pub affected_count: u32,
    pub message: String,
}

/// Handler for bulk deletion of a user's assessments.
pub struct DeleteAllAssessmentsHandler {
    assessments: Arc<dyn AssessmentStore>,
    profiles: Arc<dyn ProfileStore>,
    deletion_log: Arc<dyn DeletionLog>,
    snapshot_cache: Arc<dyn SnapshotCache>,
}

impl DeleteAllAssessmentsHandler {
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
        cmd: DeleteAllAssessmentsCommand,
        _metadata: CommandMetadata,
    ) -> Result<DeleteAllAssessmentsResult, AssessmentError> {
        // 1. The soft bulk path needs the confirmation phrase
        if !cmd.permanent && cmd.confirmation.as_deref() != Some(BULK_DELETE_CONFIRMATION) {
            return Err(AssessmentError::confirmation_required());
        }

        let now = Timestamp::now();
        let records = self.assessments.find_by_user(&cmd.user_id).await?;
        let candidates: Vec<&AssessmentRecord> = records
            .iter()
            .filter(|r| cmd.permanent || r.is_active())
            .collect();

        // 2. Zero targets: vacuous success, safe to retry
        if candidates.is_empty() {
            return Ok(DeleteAllAssessmentsResult {
                success: true,
                affected_count: 0,
                message: "No assessments to delete".to_string(),
            });
        }

        // 3. Per-record conditional transitions; stop at the first store failure
        let intended = candidates.len() as u32;
        let mut affected: u32 = 0;
        let mut store_failure: Option<AssessmentError> = None;
        for record in &candidates {
            let outcome = if cmd.permanent {
                self.assessments.purge(record.id()).await
            } else {
                self.assessments
                    .soft_delete(record.id(), now, cmd.reason.as_deref())
                    .await
            };
            match outcome {
                Ok(true) => affected += 1,
                // A concurrent delete won the state check; the end state holds.
                Ok(false) => {}
                Err(err) => {
                    store_failure = Some(err.into());
                    break;
                }
            }
        }

        if let Some(failure) = store_failure {
            if affected == 0 {
                // Nothing applied; a plain retryable error is unambiguous.
                return Err(failure);
            }
            return Ok(self.report_partial(&cmd, now, affected, intended, failure).await);
        }

        if affected == 0 {
            // Every state check lost to a concurrent deleter.
            self.snapshot_cache.invalidate(&cmd.user_id).await?;
            return Ok(DeleteAllAssessmentsResult {
                success: true,
                affected_count: 0,
                message: "Assessments already deleted".to_string(),
            });
        }

        // 4. Deleted data must never linger in a served snapshot
        self.snapshot_cache.invalidate(&cmd.user_id).await?;

        // 5. Full deletion resets the aggregates; anything left active recomputes
        let remaining = self.assessments.find_by_user(&cmd.user_id).await?;
        if remaining.iter().any(|r| r.is_active()) {
            recompute_user_aggregates(
                self.assessments.as_ref(),
                self.profiles.as_ref(),
                &cmd.user_id,
                now,
            )
            .await?;
        } else {
            reset_user_aggregates(self.profiles.as_ref(), &cmd.user_id).await?;
        }

        // 6. One bulk audit entry for the whole operation
        let event = DeletionEvent::bulk(
            cmd.user_id.clone(),
            self.kind(cmd.permanent),
            cmd.reason.clone(),
            affected,
        );
        self.deletion_log.append(&event).await?;

        debug!(
            user_id = %cmd.user_id.as_str(),
            affected,
            permanent = cmd.permanent,
            "Bulk assessment deletion applied"
        );

        let message = if cmd.permanent {
            format!("Permanently deleted {} assessment(s)", affected)
        } else {
            format!(
                "Soft deleted {} assessment(s). Restorable for {} days.",
                affected, GRACE_PERIOD_DAYS
            )
        };
        Ok(DeleteAllAssessmentsResult {
            success: true,
            affected_count: affected,
            message,
        })
    }

    /// Partial failure: some records transitioned before the store failed.
    ///
    /// The in-band partial report must reach the caller, so the follow-up
    /// work is best effort here; a retry of the whole call finishes the job.
    async fn report_partial(
        &self,
        cmd: &DeleteAllAssessmentsCommand,
        now: Timestamp,
        affected: u32,
        intended: u32,
        failure: AssessmentError,
    ) -> DeleteAllAssessmentsResult {
        error!(
            user_id = %cmd.user_id.as_str(),
            affected,
            intended,
            error = %failure,
            "Bulk deletion stopped early"
        );

        if let Err(cache_err) = self.snapshot_cache.invalidate(&cmd.user_id).await {
            error!(
                user_id = %cmd.user_id.as_str(),
                error = %cache_err,
                "Snapshot invalidation failed after partial bulk deletion"
            );
        }
        if let Err(recompute_err) = recompute_user_aggregates(
            self.assessments.as_ref(),
            self.profiles.as_ref(),
            &cmd.user_id,
            now,
        )
        .await
        {
            error!(
                user_id = %cmd.user_id.as_str(),
                error = %recompute_err,
                "Aggregate recompute failed after partial bulk deletion"
            );
        }
        let event = DeletionEvent::bulk(
            cmd.user_id.clone(),
            self.kind(cmd.permanent),
            cmd.reason.clone(),
            affected,
        );
        if let Err(log_err) = self.deletion_log.append(&event).await {
            error!(
                user_id = %cmd.user_id.as_str(),
                error = %log_err,
                "Audit append failed after partial bulk deletion"
            );
        }

        DeleteAllAssessmentsResult {
            success: false,
            affected_count: affected,
            message: format!("Partially deleted: {} of {} assessments", affected, intended),
        }
    }

    fn kind(&self, permanent: bool) -> DeletionKind {
        if permanent {
            DeletionKind::Permanent
        } else {
            DeletionKind::Soft
        }
    }
}
