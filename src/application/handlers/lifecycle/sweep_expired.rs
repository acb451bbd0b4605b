//! SweepExpired - Periodic purge of soft-deleted records past their grace period.
//!
//! Runs concurrently with user-initiated operations; the store's conditional
//! transitions make any race resolve deterministically, so a record restored
//! between the scan and the purge is simply skipped.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::assessment::{AssessmentError, DeletionEvent, DeletionKind, GRACE_PERIOD_DAYS};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{AssessmentStore, DeletionLog, SnapshotCache};

/// What one sweep pass accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub purged_count: u32,
    pub users_affected: u32,
}

/// Handler for the grace-period expiry sweep.
pub struct SweepExpiredHandler {
    assessments: Arc<dyn AssessmentStore>,
    deletion_log: Arc<dyn DeletionLog>,
    snapshot_cache: Arc<dyn SnapshotCache>,
}

impl SweepExpiredHandler {
    pub fn new(
        assessments: Arc<dyn AssessmentStore>,
        deletion_log: Arc<dyn DeletionLog>,
        snapshot_cache: Arc<dyn SnapshotCache>,
    ) -> Self {
        Self {
            assessments,
            deletion_log,
            snapshot_cache,
        }
    }

    pub async fn handle(&self) -> Result<SweepOutcome, AssessmentError> {
        // 1. Everything soft-deleted longer ago than the grace period
        let cutoff = Timestamp::now().minus_days(GRACE_PERIOD_DAYS);
        let expired = self.assessments.find_soft_deleted_before(cutoff).await?;
        if expired.is_empty() {
            return Ok(SweepOutcome {
                purged_count: 0,
                users_affected: 0,
            });
        }

        // 2. Purge row by row; one bad row must not stall the sweep
        let mut per_user: HashMap<String, (UserId, u32)> = HashMap::new();
        let mut purged_count: u32 = 0;
        for record in &expired {
            match self.assessments.purge(record.id()).await {
                Ok(true) => {
                    purged_count += 1;
                    per_user
                        .entry(record.user_id().as_str().to_string())
                        .or_insert_with(|| (record.user_id().clone(), 0))
                        .1 += 1;
                }
                // Restored or already purged since the scan.
                Ok(false) => {}
                Err(err) => {
                    error!(
                        assessment_id = %record.id(),
                        error = %err,
                        "Sweep failed to purge an expired record"
                    );
                }
            }
        }

        // 3. One audit event per affected user, plus a cache flush
        for (user_id, count) in per_user.values() {
            let event = DeletionEvent::bulk(
                user_id.clone(),
                DeletionKind::Purge,
                Some("grace period expired".to_string()),
                *count,
            );
            if let Err(err) = self.deletion_log.append(&event).await {
                error!(
                    user_id = %user_id.as_str(),
                    error = %err,
                    "Sweep failed to append a purge event"
                );
            }
            if let Err(err) = self.snapshot_cache.invalidate(user_id).await {
                error!(
                    user_id = %user_id.as_str(),
                    error = %err,
                    "Sweep failed to invalidate a snapshot"
                );
            }
        }

        let outcome = SweepOutcome {
            purged_count,
            users_affected: per_user.len() as u32,
        };
        debug!(
            purged = outcome.purged_count,
            users = outcome.users_affected,
            "Grace-period sweep completed"
        );
        Ok(outcome)
    }
}
