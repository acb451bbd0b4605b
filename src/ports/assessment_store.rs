//! Assessment record persistence port.
//!
//! The store is the source of truth for assessment records and their
//! lifecycle state. All state transitions are conditional: the store checks
//! the expected current state at commit time and reports whether the
//! transition actually happened. Callers never hold locks across calls;
//! concurrent requests racing on the same record are resolved here.

use async_trait::async_trait;

use crate::domain::assessment::AssessmentRecord;
use crate::domain::catalog::AssessmentType;
use crate::domain::foundation::{AssessmentId, DomainError, Timestamp, UserId};

/// Persistence for assessment records and their lifecycle transitions.
///
/// # Contract
///
/// Implementations must:
/// - Treat permanently deleted records as gone: no read method returns them
/// - Make each transition method a single atomic compare-and-swap on
///   lifecycle state, returning `Ok(false)` when the precondition no longer
///   holds at commit time (never an error, never a partial write)
/// - Return `ErrorCode::DatabaseError` for connectivity/query failures and
///   `ErrorCode::Timeout` when a round-trip exceeds its deadline
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Persists a newly completed assessment record.
    ///
    /// The record arrives from the assessment-taking flow already validated;
    /// the store only writes it.
    ///
    /// # Errors
    ///
    /// * `DomainError` with `DatabaseError`/`Timeout` on storage failure
    async fn insert(&self, record: &AssessmentRecord) -> Result<(), DomainError>;

    /// Loads every record for a user, active and soft-deleted alike.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<AssessmentRecord>, DomainError>;

    /// Loads every record of one instrument type for a user.
    async fn find_by_user_and_type(
        &self,
        user_id: &UserId,
        assessment_type: AssessmentType,
    ) -> Result<Vec<AssessmentRecord>, DomainError>;

    /// Loads only the user's active records.
    ///
    /// This is the input set for snapshot derivation and profile recompute.
    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AssessmentRecord>, DomainError>;

    /// Transitions one record Active -> SoftDeleted.
    ///
    /// Returns `Ok(false)` when the record was not active at commit time
    /// (already soft-deleted, purged, or never existed).
    async fn soft_delete(
        &self,
        id: &AssessmentId,
        deleted_at: Timestamp,
        reason: Option<&str>,
    ) -> Result<bool, DomainError>;

    /// Transitions one record SoftDeleted -> Active, clearing the deletion
    /// markers.
    ///
    /// Returns `Ok(false)` when the record was not soft-deleted at commit
    /// time (restored or purged concurrently).
    async fn restore(&self, id: &AssessmentId) -> Result<bool, DomainError>;

    /// Permanently removes one record in a deletable state.
    ///
    /// Permanent deletion is terminal; the row itself is removed. Returns
    /// `Ok(false)` when the record is already gone.
    async fn purge(&self, id: &AssessmentId) -> Result<bool, DomainError>;

    /// Soft-deleted records across all users whose `deleted_at` is strictly
    /// before the cutoff. Feeds the grace-period sweep.
    async fn find_soft_deleted_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<AssessmentRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_store_trait_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn AssessmentStore>();
    }
}
