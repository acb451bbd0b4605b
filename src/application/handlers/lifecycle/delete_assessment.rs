//! DeleteAssessment - Command handler for deleting one assessment type.

use std::sync::Arc;

use tracing::debug;

use crate::domain::assessment::{
    AssessmentError, AssessmentRecord, DeletionEvent, DeletionKind, GRACE_PERIOD_DAYS,
};
use crate::domain::catalog::AssessmentType;
use crate::domain::foundation::{CommandMetadata, Timestamp, UserId};
use crate::ports::{AssessmentStore, DeletionLog, ProfileStore, SnapshotCache};

use super::cascade::recompute_user_aggregates;

/// Command to delete every record of one assessment type for a user.
#[derive(Debug, Clone)]
pub struct DeleteAssessmentCommand {
    pub user_id: UserId,
    /// Raw type code or dimension key, validated against the catalog.
    pub assessment_type: String,
    /// Recompute the profile and rollups from the remaining active set.
    pub cascade: bool,
    /// Purge instead of soft delete. Irreversible.
    pub permanent: bool,
    pub reason: Option<String>,
}

/// What a deletion touched, echoed back to the caller.
#[derive(Debug, Clone)]
pub struct AffectedAssessments {
    pub assessment_type: String,
    pub titles: Vec<String>,
}

/// Outcome of a single-type deletion.
///
/// `success == false` with `affected_count == 0` is the logical no-op
/// (nothing in a deletable state); infrastructure failures are `Err`.
#[derive(Debug, Clone)]
pub struct DeleteAssessmentResult {
    pub success: bool,
    pub affected_count: u32,
    pub message: String,
    pub affected: Option<AffectedAssessments>,
}

/// Handler for deleting the records of one assessment type.
pub struct DeleteAssessmentHandler {
    assessments: Arc<dyn AssessmentStore>,
    profiles: Arc<dyn ProfileStore>,
    deletion_log: Arc<dyn DeletionLog>,
    snapshot_cache: Arc<dyn SnapshotCache>,
}

impl DeleteAssessmentHandler {
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
        cmd: DeleteAssessmentCommand,
        _metadata: CommandMetadata,
    ) -> Result<DeleteAssessmentResult, AssessmentError> {
        // 1. Validate the type before touching storage
        let assessment_type = AssessmentType::parse(&cmd.assessment_type)
            .map_err(|_| AssessmentError::unknown_type(cmd.assessment_type.clone()))?;

        let now = Timestamp::now();
        let records = self
            .assessments
            .find_by_user_and_type(&cmd.user_id, assessment_type)
            .await?;

        // 2. Only records in a deletable state for this path are candidates:
        //    Active for a soft delete, Active or SoftDeleted for a permanent one
        let candidates: Vec<&AssessmentRecord> = records
            .iter()
            .filter(|r| cmd.permanent || r.is_active())
            .collect();

        if candidates.is_empty() {
            // Retrying an identical soft delete is a no-op success.
            let already_deleted = !cmd.permanent
                && !records.is_empty()
                && records
                    .iter()
                    .all(|r| r.is_soft_deleted() && r.deletion_reason() == cmd.reason.as_deref());
            if already_deleted {
                self.snapshot_cache.invalidate(&cmd.user_id).await?;
                return Ok(DeleteAssessmentResult {
                    success: true,
                    affected_count: 0,
                    message: format!(
                        "{} assessments already soft deleted",
                        assessment_type.display_name()
                    ),
                    affected: None,
                });
            }
            return Ok(Self::not_found(assessment_type));
        }

        // 3. Transition each candidate; the store's state check settles races
        let mut affected_titles = Vec::new();
        for record in &candidates {
            let transitioned = if cmd.permanent {
                self.assessments.purge(record.id()).await?
            } else {
                self.assessments
                    .soft_delete(record.id(), now, cmd.reason.as_deref())
                    .await?
            };
            if transitioned {
                affected_titles.push(record.title().to_string());
            }
        }
        let affected_count = affected_titles.len() as u32;

        if affected_count == 0 {
            // A concurrent delete won every state check.
            return Ok(Self::not_found(assessment_type));
        }

        // 4. Deleted data must never linger in a served snapshot
        self.snapshot_cache.invalidate(&cmd.user_id).await?;

        // 5. Cascade keeps the derived aggregates honest
        if cmd.cascade {
            recompute_user_aggregates(
                self.assessments.as_ref(),
                self.profiles.as_ref(),
                &cmd.user_id,
                now,
            )
            .await?;
        }

        // 6. Audit trail
        let kind = if cmd.permanent {
            DeletionKind::Permanent
        } else {
            DeletionKind::Soft
        };
        let event = DeletionEvent::for_type(
            cmd.user_id.clone(),
            assessment_type,
            kind,
            cmd.reason.clone(),
            affected_count,
        );
        self.deletion_log.append(&event).await?;

        debug!(
            user_id = %cmd.user_id.as_str(),
            assessment_type = %assessment_type.code(),
            affected = affected_count,
            permanent = cmd.permanent,
            "Assessment deletion applied"
        );

        let message = if cmd.permanent {
            format!(
                "Permanently deleted {} {} assessment(s)",
                affected_count,
                assessment_type.display_name()
            )
        } else {
            format!(
                "Soft deleted {} {} assessment(s). Restorable for {} days.",
                affected_count,
                assessment_type.display_name(),
                GRACE_PERIOD_DAYS
            )
        };

        Ok(DeleteAssessmentResult {
            success: true,
            affected_count,
            message,
            affected: Some(AffectedAssessments {
                assessment_type: assessment_type.code().to_string(),
                titles: affected_titles,
            }),
        })
    }

    fn not_found(assessment_type: AssessmentType) -> DeleteAssessmentResult {
        DeleteAssessmentResult {
            success: false,
            affected_count: 0,
            message: format!(
                "{} assessment not found in a deletable state",
                assessment_type.display_name()
            ),
            affected: None,
        }
    }
}
