//! GetDeletionHistory - Read-only audit trail of deletion activity.

use std::sync::Arc;

use crate::domain::assessment::{AssessmentError, DeletionEvent};
use crate::domain::foundation::{CommandMetadata, UserId};
use crate::ports::DeletionLog;

/// Query for a user's deletion audit trail.
#[derive(Debug, Clone)]
pub struct GetDeletionHistoryQuery {
    pub user_id: UserId,
    /// Upper bound on returned events.
    pub limit: usize,
}

/// Handler for the deletion history query. Events come back newest first.
pub struct GetDeletionHistoryHandler {
    deletion_log: Arc<dyn DeletionLog>,
}

impl GetDeletionHistoryHandler {
    pub fn new(deletion_log: Arc<dyn DeletionLog>) -> Self {
        Self { deletion_log }
    }

    pub async fn handle(
        &self,
        query: GetDeletionHistoryQuery,
        _metadata: CommandMetadata,
    ) -> Result<Vec<DeletionEvent>, AssessmentError> {
        let events = self
            .deletion_log
            .find_by_user(&query.user_id, query.limit)
            .await?;
        Ok(events)
    }
}
