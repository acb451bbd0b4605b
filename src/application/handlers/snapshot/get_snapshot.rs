//! GetSnapshot - Serves the derived wellness snapshot, cache first.
//!
//! Cache trouble on this read path degrades to a fresh derivation instead
//! of failing the request; mutations are the ones that must not miss an
//! invalidation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::assessment::AssessmentError;
use crate::domain::foundation::{CommandMetadata, Timestamp, UserId};
use crate::domain::snapshot::{derive_snapshot, WellnessSnapshot};
use crate::ports::{AssessmentStore, SnapshotCache};

/// Query for a user's wellness snapshot.
#[derive(Debug, Clone)]
pub struct GetSnapshotQuery {
    pub user_id: UserId,
}

/// Handler for snapshot reads.
///
/// `None` means "nothing assessed yet"; a user whose every record is
/// deleted gets `None`, not an empty snapshot.
pub struct GetSnapshotHandler {
    assessments: Arc<dyn AssessmentStore>,
    snapshot_cache: Arc<dyn SnapshotCache>,
    ttl_secs: u64,
}

impl GetSnapshotHandler {
    pub fn new(
        assessments: Arc<dyn AssessmentStore>,
        snapshot_cache: Arc<dyn SnapshotCache>,
        ttl_secs: u64,
    ) -> Self {
        Self {
            assessments,
            snapshot_cache,
            ttl_secs,
        }
    }

    pub async fn handle(
        &self,
        query: GetSnapshotQuery,
        _metadata: CommandMetadata,
    ) -> Result<Option<WellnessSnapshot>, AssessmentError> {
        // 1. Cache first; a broken cache is a miss, not a failure
        match self.snapshot_cache.get(&query.user_id).await {
            Ok(Some(snapshot)) => {
                debug!(user_id = %query.user_id.as_str(), "Snapshot served from cache");
                return Ok(Some(snapshot));
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    user_id = %query.user_id.as_str(),
                    error = %err,
                    "Snapshot cache read failed; deriving fresh"
                );
            }
        }

        // 2. Derive from the active records
        let records = self.assessments.find_active_by_user(&query.user_id).await?;
        let Some(snapshot) = derive_snapshot(&records, Timestamp::now()) else {
            return Ok(None);
        };

        // 3. Populate the cache, but never at the cost of the response
        if let Err(err) = self
            .snapshot_cache
            .put(&query.user_id, &snapshot, self.ttl_secs)
            .await
        {
            warn!(
                user_id = %query.user_id.as_str(),
                error = %err,
                "Snapshot cache write failed"
            );
        }

        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAssessmentStore, InMemorySnapshotCache};
    use crate::domain::assessment::{AssessmentRecord, LifecycleState};
    use crate::domain::catalog::{AssessmentType, SeverityBand};
    use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode};
    use async_trait::async_trait;

    const TTL: u64 = 300;

    fn active_record(
        assessment_type: AssessmentType,
        score: i32,
        severity: SeverityBand,
        taken_at: Timestamp,
    ) -> AssessmentRecord {
        AssessmentRecord::reconstitute(
            AssessmentId::new(),
            UserId::new("user-1").unwrap(),
            assessment_type,
            format!("{} check-in", assessment_type.display_name()),
            score,
            Some(severity),
            vec![],
            serde_json::json!({"score": score}),
            taken_at,
            LifecycleState::Active,
        )
    }

    fn query() -> GetSnapshotQuery {
        GetSnapshotQuery {
            user_id: UserId::new("user-1").unwrap(),
        }
    }

    fn test_metadata() -> CommandMetadata {
        CommandMetadata::new(UserId::new("user-1").unwrap())
    }

    #[tokio::test]
    async fn snapshot_is_derived_and_cached_on_a_miss() {
        let now = Timestamp::now();
        let assessments = Arc::new(
            InMemoryAssessmentStore::new()
                .with_record(active_record(
                    AssessmentType::Depression,
                    12,
                    SeverityBand::Moderate,
                    now.minus_days(2),
                ))
                .with_record(active_record(
                    AssessmentType::Anxiety,
                    8,
                    SeverityBand::Mild,
                    now.minus_days(3),
                )),
        );
        let cache = Arc::new(InMemorySnapshotCache::new());
        let handler = GetSnapshotHandler::new(assessments, cache.clone(), TTL);

        let snapshot = handler
            .handle(query(), test_metadata())
            .await
            .unwrap()
            .expect("snapshot expected");

        assert_eq!(snapshot.dimensions.len(), 2);
        assert!(snapshot
            .dimensions
            .iter()
            .any(|d| d.key == "depression"));
        let cached = cache
            .get(&UserId::new("user-1").unwrap())
            .await
            .unwrap()
            .expect("cache should be populated");
        assert_eq!(cached.dimensions.len(), 2);
    }

    #[tokio::test]
    async fn cached_snapshot_wins_over_a_fresh_derivation() {
        let now = Timestamp::now();
        let assessments = Arc::new(InMemoryAssessmentStore::new().with_record(active_record(
            AssessmentType::Depression,
            12,
            SeverityBand::Moderate,
            now,
        )));
        let cache = Arc::new(InMemorySnapshotCache::new());
        let handler = GetSnapshotHandler::new(assessments.clone(), cache.clone(), TTL);

        let first = handler
            .handle(query(), test_metadata())
            .await
            .unwrap()
            .expect("snapshot expected");

        // New activity with no invalidation: the cached view still wins
        // until the TTL runs out or a lifecycle operation flushes it.
        assessments
            .add_record(active_record(
                AssessmentType::Anxiety,
                8,
                SeverityBand::Mild,
                now,
            ));
        let second = handler
            .handle(query(), test_metadata())
            .await
            .unwrap()
            .expect("snapshot expected");

        assert_eq!(second.dimensions.len(), first.dimensions.len());
    }

    #[tokio::test]
    async fn no_active_records_means_no_snapshot() {
        let now = Timestamp::now();
        let assessments = Arc::new(InMemoryAssessmentStore::new().with_record(
            AssessmentRecord::reconstitute(
                AssessmentId::new(),
                UserId::new("user-1").unwrap(),
                AssessmentType::Depression,
                "PHQ-9 check-in".to_string(),
                12,
                Some(SeverityBand::Moderate),
                vec![],
                serde_json::json!({}),
                now,
                LifecycleState::SoftDeleted {
                    deleted_at: now,
                    reason: None,
                },
            ),
        ));
        let handler = GetSnapshotHandler::new(
            assessments,
            Arc::new(InMemorySnapshotCache::new()),
            TTL,
        );

        let snapshot = handler.handle(query(), test_metadata()).await.unwrap();

        assert!(snapshot.is_none());
    }

    /// Cache that fails every operation.
    struct BrokenSnapshotCache;

    #[async_trait]
    impl crate::ports::SnapshotCache for BrokenSnapshotCache {
        async fn get(&self, _user_id: &UserId) -> Result<Option<WellnessSnapshot>, DomainError> {
            Err(DomainError::new(ErrorCode::CacheError, "connection refused"))
        }

        async fn put(
            &self,
            _user_id: &UserId,
            _snapshot: &WellnessSnapshot,
            _ttl_secs: u64,
        ) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::CacheError, "connection refused"))
        }

        async fn invalidate(&self, _user_id: &UserId) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::CacheError, "connection refused"))
        }
    }

    #[tokio::test]
    async fn a_broken_cache_degrades_to_fresh_derivation() {
        let now = Timestamp::now();
        let assessments = Arc::new(InMemoryAssessmentStore::new().with_record(active_record(
            AssessmentType::Depression,
            12,
            SeverityBand::Moderate,
            now,
        )));
        let handler = GetSnapshotHandler::new(assessments, Arc::new(BrokenSnapshotCache), TTL);

        let snapshot = handler
            .handle(query(), test_metadata())
            .await
            .unwrap()
            .expect("snapshot expected despite cache failure");

        assert_eq!(snapshot.dimensions.len(), 1);
        assert_eq!(snapshot.dimensions[0].key, "depression");
    }
}
