//! In-memory snapshot cache for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::snapshot::WellnessSnapshot;
use crate::ports::SnapshotCache;

/// In-memory `SnapshotCache` with real TTL expiry.
#[derive(Debug, Default)]
pub struct InMemorySnapshotCache {
    entries: Mutex<HashMap<String, (WellnessSnapshot, Instant)>>,
    invalidations: Mutex<u32>,
}

impl InMemorySnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `invalidate` has been called. Lets tests assert that
    /// lifecycle mutations drop the cache synchronously.
    pub fn invalidation_count(&self) -> u32 {
        *self.invalidations.lock().unwrap()
    }
}

#[async_trait]
impl SnapshotCache for InMemorySnapshotCache {
    async fn get(&self, user_id: &UserId) -> Result<Option<WellnessSnapshot>, DomainError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(user_id.as_str()).and_then(|(snapshot, expires_at)| {
            if Instant::now() < *expires_at {
                Some(snapshot.clone())
            } else {
                None
            }
        }))
    }

    async fn put(
        &self,
        user_id: &UserId,
        snapshot: &WellnessSnapshot,
        ttl_secs: u64,
    ) -> Result<(), DomainError> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries
            .lock()
            .unwrap()
            .insert(user_id.as_str().to_string(), (snapshot.clone(), expires_at));
        Ok(())
    }

    async fn invalidate(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.entries.lock().unwrap().remove(user_id.as_str());
        *self.invalidations.lock().unwrap() += 1;
        Ok(())
    }
}
