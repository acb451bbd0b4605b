//! Redis-backed snapshot cache for production deployments.
//!
//! Snapshots are stored as JSON under a per-user key with SETEX so stale
//! entries age out even if an invalidation is missed.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::snapshot::WellnessSnapshot;
use crate::ports::SnapshotCache;

/// Redis-backed snapshot cache.
#[derive(Clone)]
pub struct RedisSnapshotCache {
    conn: MultiplexedConnection,
    op_timeout: Duration,
}

impl RedisSnapshotCache {
    /// Creates a new RedisSnapshotCache.
    pub fn new(conn: MultiplexedConnection, op_timeout: Duration) -> Self {
        Self { conn, op_timeout }
    }
}

fn cache_key(user_id: &UserId) -> String {
    format!("snapshot:{}", user_id.as_str())
}

/// Runs a cache call with a bounded timeout.
async fn bounded<T, F>(limit: Duration, op: &str, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(|e| {
            DomainError::new(ErrorCode::CacheError, format!("Failed to {}: {}", op, e))
        }),
        Err(_) => Err(DomainError::new(
            ErrorCode::Timeout,
            format!("Timed out trying to {}", op),
        )),
    }
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    async fn get(&self, user_id: &UserId) -> Result<Option<WellnessSnapshot>, DomainError> {
        let key = cache_key(user_id);
        let mut conn = self.conn.clone();

        let payload: Option<String> =
            bounded(self.op_timeout, "read cached snapshot", conn.get(&key)).await?;

        match payload {
            Some(json) => {
                let snapshot = serde_json::from_str(&json).map_err(|e| {
                    DomainError::new(
                        ErrorCode::CacheError,
                        format!("Failed to parse cached snapshot: {}", e),
                    )
                })?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        user_id: &UserId,
        snapshot: &WellnessSnapshot,
        ttl_secs: u64,
    ) -> Result<(), DomainError> {
        let key = cache_key(user_id);
        let payload = serde_json::to_string(snapshot).map_err(|e| {
            DomainError::new(
                ErrorCode::CacheError,
                format!("Failed to serialize snapshot: {}", e),
            )
        })?;
        let mut conn = self.conn.clone();

        bounded(
            self.op_timeout,
            "cache snapshot",
            conn.set_ex::<_, _, ()>(&key, payload, ttl_secs),
        )
        .await?;

        Ok(())
    }

    async fn invalidate(&self, user_id: &UserId) -> Result<(), DomainError> {
        let key = cache_key(user_id);
        let mut conn = self.conn.clone();

        bounded(self.op_timeout, "invalidate snapshot", conn.del::<_, ()>(&key)).await?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisSnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSnapshotCache")
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}
