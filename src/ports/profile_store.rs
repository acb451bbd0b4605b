//! Derived profile persistence port.
//!
//! The profile and its per-dimension rollup rows are derived data: they are
//! recomputed from the active record set whenever that set changes and
//! overwritten wholesale. No history is kept here; the audit trail lives in
//! the deletion log.

use async_trait::async_trait;

use crate::domain::assessment::{DimensionRollup, UserAssessmentProfile};
use crate::domain::foundation::{DomainError, UserId};

/// Persistence for the per-user derived profile and overall rollup rows.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` from `find_by_user` for users with no profile yet
/// - Make `upsert` insert-or-overwrite on `user_id`
/// - Make `replace_rollups` atomic per user: readers see either the old
///   rollup set or the new one, never a mix
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads the user's derived profile, if one has been computed.
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserAssessmentProfile>, DomainError>;

    /// Inserts or overwrites the user's profile.
    async fn upsert(&self, profile: &UserAssessmentProfile) -> Result<(), DomainError>;

    /// Replaces the user's overall rollup rows wholesale.
    ///
    /// An empty slice clears them, which is the full-reset path.
    async fn replace_rollups(
        &self,
        user_id: &UserId,
        rollups: &[DimensionRollup],
    ) -> Result<(), DomainError>;

    /// Loads the user's current rollup rows, one per dimension.
    async fn find_rollups(&self, user_id: &UserId) -> Result<Vec<DimensionRollup>, DomainError>;
}
