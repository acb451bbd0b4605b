//! Deletion audit trail port.
//!
//! Every lifecycle mutation appends one event here. The log is append-only:
//! nothing updates or removes entries, including permanent deletion of the
//! records the entries describe.

use async_trait::async_trait;

use crate::domain::assessment::DeletionEvent;
use crate::domain::foundation::{DomainError, UserId};

/// Append-only audit log of deletion, restore, and purge events.
#[async_trait]
pub trait DeletionLog: Send + Sync {
    /// Appends one audit entry.
    ///
    /// # Errors
    ///
    /// * `DomainError` with `DatabaseError`/`Timeout` on storage failure
    async fn append(&self, event: &DeletionEvent) -> Result<(), DomainError>;

    /// The user's audit trail, newest first, capped at `limit` entries.
    async fn find_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<DeletionEvent>, DomainError>;
}
