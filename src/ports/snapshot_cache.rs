//! Wellness snapshot cache port.
//!
//! Snapshots are derivable from the store at any time, so the cache is an
//! optimization, never a source of truth. The one correctness requirement
//! is invalidation: lifecycle handlers drop a user's cached snapshot
//! synchronously after every successful mutation so a deleted assessment
//! can never linger in a served snapshot.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::snapshot::WellnessSnapshot;

/// TTL cache for derived wellness snapshots, keyed by user.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` for absent or expired entries
/// - Expire entries after the TTL given to `put`
/// - Make `invalidate` idempotent: removing an absent entry is `Ok(())`
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// The user's cached snapshot, if present and unexpired.
    async fn get(&self, user_id: &UserId) -> Result<Option<WellnessSnapshot>, DomainError>;

    /// Stores the user's snapshot for `ttl_secs` seconds.
    async fn put(
        &self,
        user_id: &UserId,
        snapshot: &WellnessSnapshot,
        ttl_secs: u64,
    ) -> Result<(), DomainError>;

    /// Drops the user's cached snapshot.
    async fn invalidate(&self, user_id: &UserId) -> Result<(), DomainError>;
}
