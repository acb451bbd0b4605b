//! Integration tests for the assessment lifecycle.
//!
//! These tests run the command and query handlers end to end over the
//! in-memory adapters:
//! 1. Soft deletion cascades into profile and rollup recomputation
//! 2. Bulk deletion honors the confirmation phrase
//! 3. Restoration works inside the grace period and nowhere else
//! 4. The sweep purges only records whose grace period has lapsed

use std::sync::Arc;

use mindhaven::adapters::memory::{
    InMemoryAssessmentStore, InMemoryDeletionLog, InMemoryProfileStore, InMemorySnapshotCache,
};
use mindhaven::application::handlers::{
    CanRestoreQuery, DeleteAllAssessmentsCommand, DeleteAllAssessmentsHandler,
    DeleteAssessmentCommand, DeleteAssessmentHandler, GetSnapshotHandler, GetSnapshotQuery,
    GetSummaryHandler, GetSummaryQuery, RestoreAssessmentCommand, RestoreAssessmentHandler,
    SweepExpiredHandler,
};
use mindhaven::domain::assessment::{
    AssessmentRecord, DeletionKind, LifecycleState, GRACE_PERIOD_DAYS,
};
use mindhaven::domain::catalog::{AssessmentType, SeverityBand};
use mindhaven::domain::foundation::{
    AssessmentId, CommandMetadata, ErrorCode, Timestamp, UserId,
};
use mindhaven::ports::{AssessmentStore, DeletionLog, ProfileStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

const SNAPSHOT_TTL: u64 = 300;
const CONFIRMATION: &str = "DELETE ALL MY ASSESSMENTS";

/// All four in-memory stores plus every handler wired against them.
struct World {
    assessments: Arc<InMemoryAssessmentStore>,
    profiles: Arc<InMemoryProfileStore>,
    deletion_log: Arc<InMemoryDeletionLog>,
    snapshot_cache: Arc<InMemorySnapshotCache>,
}

impl World {
    fn new(assessments: InMemoryAssessmentStore) -> Self {
        Self {
            assessments: Arc::new(assessments),
            profiles: Arc::new(InMemoryProfileStore::new()),
            deletion_log: Arc::new(InMemoryDeletionLog::new()),
            snapshot_cache: Arc::new(InMemorySnapshotCache::new()),
        }
    }

    fn delete_handler(&self) -> DeleteAssessmentHandler {
        DeleteAssessmentHandler::new(
            self.assessments.clone(),
            self.profiles.clone(),
            self.deletion_log.clone(),
            self.snapshot_cache.clone(),
        )
    }

    fn delete_all_handler(&self) -> DeleteAllAssessmentsHandler {
        DeleteAllAssessmentsHandler::new(
            self.assessments.clone(),
            self.profiles.clone(),
            self.deletion_log.clone(),
            self.snapshot_cache.clone(),
        )
    }

    fn restore_handler(&self) -> RestoreAssessmentHandler {
        RestoreAssessmentHandler::new(
            self.assessments.clone(),
            self.profiles.clone(),
            self.deletion_log.clone(),
            self.snapshot_cache.clone(),
        )
    }

    fn summary_handler(&self) -> GetSummaryHandler {
        GetSummaryHandler::new(self.assessments.clone(), self.profiles.clone())
    }

    fn snapshot_handler(&self) -> GetSnapshotHandler {
        GetSnapshotHandler::new(
            self.assessments.clone(),
            self.snapshot_cache.clone(),
            SNAPSHOT_TTL,
        )
    }

    fn sweeper(&self) -> SweepExpiredHandler {
        SweepExpiredHandler::new(
            self.assessments.clone(),
            self.deletion_log.clone(),
            self.snapshot_cache.clone(),
        )
    }
}

fn user_id() -> UserId {
    UserId::new("user-integration").unwrap()
}

fn metadata() -> CommandMetadata {
    CommandMetadata::new(user_id()).with_correlation_id("lifecycle-flow-test")
}

fn active_record(
    assessment_type: AssessmentType,
    score: i32,
    severity: SeverityBand,
    taken_at: Timestamp,
) -> AssessmentRecord {
    AssessmentRecord::reconstitute(
        AssessmentId::new(),
        user_id(),
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

fn soft_deleted_record(
    assessment_type: AssessmentType,
    score: i32,
    taken_at: Timestamp,
    deleted_at: Timestamp,
) -> AssessmentRecord {
    AssessmentRecord::reconstitute(
        AssessmentId::new(),
        user_id(),
        assessment_type,
        format!("{} check-in", assessment_type.display_name()),
        score,
        Some(SeverityBand::Moderate),
        vec![],
        serde_json::json!({"score": score}),
        taken_at,
        LifecycleState::SoftDeleted {
            deleted_at,
            reason: None,
        },
    )
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn soft_delete_cascades_into_aggregates_and_snapshot() {
    let now = Timestamp::now();
    let world = World::new(
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
    let snapshot_handler = world.snapshot_handler();

    // Warm the cache with both dimensions present.
    let before = snapshot_handler
        .handle(GetSnapshotQuery { user_id: user_id() }, metadata())
        .await
        .unwrap()
        .expect("snapshot expected");
    assert_eq!(before.dimensions.len(), 2);

    let result = world
        .delete_handler()
        .handle(
            DeleteAssessmentCommand {
                user_id: user_id(),
                assessment_type: "phq9".to_string(),
                cascade: true,
                permanent: false,
                reason: Some("making space".to_string()),
            },
            metadata(),
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.affected_count, 1);
    let affected = result.affected.expect("affected data expected");
    assert_eq!(affected.assessment_type, "phq9");
    assert_eq!(affected.titles, vec!["PHQ-9 check-in".to_string()]);

    // The record survives in storage, just not in the active set.
    let stored = world.assessments.find_by_user(&user_id()).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.iter().filter(|r| r.is_active()).count(), 1);

    // Aggregates now reflect only the surviving anxiety record.
    let profile = world
        .profiles
        .find_by_user(&user_id())
        .await
        .unwrap()
        .expect("cascade should write a profile");
    assert!(profile.last_assessed_at().is_some());
    let rollups = world.profiles.find_rollups(&user_id()).await.unwrap();
    assert_eq!(rollups.len(), 1);
    assert_eq!(rollups[0].dimension_key, "anxiety");

    // The invalidated cache forces a re-derivation without the deleted record.
    let after = snapshot_handler
        .handle(GetSnapshotQuery { user_id: user_id() }, metadata())
        .await
        .unwrap()
        .expect("snapshot expected");
    assert_eq!(after.dimensions.len(), 1);
    assert_eq!(after.dimensions[0].key, "anxiety");

    // And the audit trail has exactly one soft-delete entry for the type.
    let events = world.deletion_log.find_by_user(&user_id(), 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, DeletionKind::Soft);
    assert_eq!(events[0].assessment_type, Some(AssessmentType::Depression));
    assert_eq!(events[0].reason.as_deref(), Some("making space"));
}

#[tokio::test]
async fn bulk_soft_delete_requires_the_confirmation_phrase() {
    let now = Timestamp::now();
    let world = World::new(
        InMemoryAssessmentStore::new()
            .with_record(active_record(
                AssessmentType::Depression,
                12,
                SeverityBand::Moderate,
                now,
            ))
            .with_record(active_record(
                AssessmentType::Stress,
                24,
                SeverityBand::Moderate,
                now,
            )),
    );
    let handler = world.delete_all_handler();

    let err = handler
        .handle(
            DeleteAllAssessmentsCommand {
                user_id: user_id(),
                permanent: false,
                reason: None,
                confirmation: None,
            },
            metadata(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfirmationRequired);

    // Nothing moved: both records are still active.
    let active = world
        .assessments
        .find_active_by_user(&user_id())
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(world.deletion_log.event_count(), 0);

    let result = handler
        .handle(
            DeleteAllAssessmentsCommand {
                user_id: user_id(),
                permanent: false,
                reason: Some("starting over".to_string()),
                confirmation: Some(CONFIRMATION.to_string()),
            },
            metadata(),
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.affected_count, 2);

    // Everything is deleted, so the snapshot disappears entirely.
    let snapshot = world
        .snapshot_handler()
        .handle(GetSnapshotQuery { user_id: user_id() }, metadata())
        .await
        .unwrap();
    assert!(snapshot.is_none());

    // A full deletion resets the aggregates.
    assert!(world
        .profiles
        .find_rollups(&user_id())
        .await
        .unwrap()
        .is_empty());

    // The summary agrees: nothing active, both records waiting out the grace period.
    let summary = world
        .summary_handler()
        .handle(
            GetSummaryQuery {
                user_id: user_id(),
                include_deleted: true,
            },
            metadata(),
        )
        .await
        .unwrap();
    assert!(summary.active_assessments.is_empty());
    assert_eq!(summary.deleted_assessments.len(), 2);

    // One bulk audit entry covers the whole operation.
    let events = world.deletion_log.find_by_user(&user_id(), 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_bulk());
    assert_eq!(events[0].affected_count, 2);
}

#[tokio::test]
async fn summary_shows_deleted_records_with_their_grace_countdown() {
    let now = Timestamp::now();
    let world = World::new(
        InMemoryAssessmentStore::new()
            .with_record(active_record(
                AssessmentType::Anxiety,
                8,
                SeverityBand::Mild,
                now,
            ))
            .with_record(soft_deleted_record(
                AssessmentType::Depression,
                12,
                now.minus_days(10),
                now.minus_days(4),
            )),
    );
    let handler = world.summary_handler();

    let without_deleted = handler
        .handle(
            GetSummaryQuery {
                user_id: user_id(),
                include_deleted: false,
            },
            metadata(),
        )
        .await
        .unwrap();
    assert_eq!(without_deleted.active_assessments.len(), 1);
    assert!(without_deleted.deleted_assessments.is_empty());

    let with_deleted = handler
        .handle(
            GetSummaryQuery {
                user_id: user_id(),
                include_deleted: true,
            },
            metadata(),
        )
        .await
        .unwrap();
    assert_eq!(with_deleted.deleted_assessments.len(), 1);
    let deleted = &with_deleted.deleted_assessments[0];
    assert_eq!(deleted.assessment_type, "phq9");
    // Deleted four days ago leaves a little under 26 days of grace.
    assert!(deleted.days_left_in_grace <= GRACE_PERIOD_DAYS - 4);
    assert!(deleted.days_left_in_grace >= GRACE_PERIOD_DAYS - 5);
}

#[tokio::test]
async fn restore_inside_grace_brings_the_record_back_unchanged() {
    let now = Timestamp::now();
    let taken_at = now.minus_days(10);
    let world = World::new(InMemoryAssessmentStore::new().with_record(soft_deleted_record(
        AssessmentType::Depression,
        12,
        taken_at,
        now.minus_days(1),
    )));
    let handler = world.restore_handler();

    assert!(handler
        .can_restore(CanRestoreQuery {
            user_id: user_id(),
            assessment_type: "phq9".to_string(),
        })
        .await
        .unwrap());

    let result = handler
        .handle(
            RestoreAssessmentCommand {
                user_id: user_id(),
                assessment_type: "phq9".to_string(),
            },
            metadata(),
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.restored_count, 1);

    let records = world.assessments.find_by_user(&user_id()).await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert!(record.is_active());
    assert!(record.deleted_at().is_none());
    assert!(record.deletion_reason().is_none());
    // Content fields survive the round trip untouched.
    assert_eq!(record.score(), 12);
    assert_eq!(record.taken_at(), &taken_at);

    // Restoration recomputes the aggregates from the revived set.
    let rollups = world.profiles.find_rollups(&user_id()).await.unwrap();
    assert_eq!(rollups.len(), 1);
    assert_eq!(rollups[0].dimension_key, "depression");

    let events = world.deletion_log.find_by_user(&user_id(), 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, DeletionKind::Restore);
}

#[tokio::test]
async fn stacked_retakes_restore_only_the_newest() {
    let now = Timestamp::now();
    let older_taken = now.minus_days(20);
    let newer_taken = now.minus_days(5);
    let world = World::new(
        InMemoryAssessmentStore::new()
            .with_record(soft_deleted_record(
                AssessmentType::Anxiety,
                14,
                older_taken,
                now.minus_days(2),
            ))
            .with_record(soft_deleted_record(
                AssessmentType::Anxiety,
                6,
                newer_taken,
                now.minus_days(2),
            )),
    );

    let result = world
        .restore_handler()
        .handle(
            RestoreAssessmentCommand {
                user_id: user_id(),
                assessment_type: "gad7".to_string(),
            },
            metadata(),
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.restored_count, 1);

    let records = world.assessments.find_by_user(&user_id()).await.unwrap();
    let active: Vec<_> = records.iter().filter(|r| r.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].taken_at(), &newer_taken);
    assert_eq!(records.iter().filter(|r| r.is_soft_deleted()).count(), 1);
}

#[tokio::test]
async fn permanent_deletion_is_terminal() {
    let now = Timestamp::now();
    let world = World::new(InMemoryAssessmentStore::new().with_record(active_record(
        AssessmentType::Wellbeing,
        18,
        SeverityBand::Normal,
        now,
    )));

    let result = world
        .delete_handler()
        .handle(
            DeleteAssessmentCommand {
                user_id: user_id(),
                assessment_type: "who5".to_string(),
                cascade: true,
                permanent: true,
                reason: None,
            },
            metadata(),
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.affected_count, 1);
    // Purged rows are physically gone.
    assert_eq!(world.assessments.record_count(), 0);

    let restore_handler = world.restore_handler();
    assert!(!restore_handler
        .can_restore(CanRestoreQuery {
            user_id: user_id(),
            assessment_type: "who5".to_string(),
        })
        .await
        .unwrap());

    let restore = restore_handler
        .handle(
            RestoreAssessmentCommand {
                user_id: user_id(),
                assessment_type: "who5".to_string(),
            },
            metadata(),
        )
        .await
        .unwrap();
    assert!(!restore.success);
    assert_eq!(restore.restored_count, 0);
}

#[tokio::test]
async fn restore_outside_grace_fails_without_touching_the_record() {
    let now = Timestamp::now();
    let world = World::new(InMemoryAssessmentStore::new().with_record(soft_deleted_record(
        AssessmentType::Depression,
        9,
        now.minus_days(60),
        now.minus_days(GRACE_PERIOD_DAYS + 5),
    )));
    let handler = world.restore_handler();

    assert!(!handler
        .can_restore(CanRestoreQuery {
            user_id: user_id(),
            assessment_type: "phq9".to_string(),
        })
        .await
        .unwrap());

    let result = handler
        .handle(
            RestoreAssessmentCommand {
                user_id: user_id(),
                assessment_type: "phq9".to_string(),
            },
            metadata(),
        )
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.message.contains("grace period"));
    let records = world.assessments.find_by_user(&user_id()).await.unwrap();
    assert!(records[0].is_soft_deleted());
    // Failed restores leave no audit entry.
    assert_eq!(world.deletion_log.event_count(), 0);
}

#[tokio::test]
async fn the_sweep_closes_the_grace_window_that_deletion_opened() {
    let now = Timestamp::now();
    let world = World::new(
        InMemoryAssessmentStore::new()
            .with_record(soft_deleted_record(
                AssessmentType::Depression,
                12,
                now.minus_days(50),
                now.minus_days(GRACE_PERIOD_DAYS + 2),
            ))
            .with_record(active_record(
                AssessmentType::Anxiety,
                8,
                SeverityBand::Mild,
                now,
            )),
    );

    // A fresh user-initiated soft delete opens a new grace window.
    world
        .delete_handler()
        .handle(
            DeleteAssessmentCommand {
                user_id: user_id(),
                assessment_type: "gad7".to_string(),
                cascade: true,
                permanent: false,
                reason: None,
            },
            metadata(),
        )
        .await
        .unwrap();

    // The sweep takes the lapsed record and leaves the fresh one alone.
    let outcome = world.sweeper().handle().await.unwrap();
    assert_eq!(outcome.purged_count, 1);
    assert_eq!(outcome.users_affected, 1);

    let records = world.assessments.find_by_user(&user_id()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].assessment_type(), AssessmentType::Anxiety);

    // The surviving window still honors a restore.
    let restored = world
        .restore_handler()
        .handle(
            RestoreAssessmentCommand {
                user_id: user_id(),
                assessment_type: "gad7".to_string(),
            },
            metadata(),
        )
        .await
        .unwrap();
    assert!(restored.success);

    // The purged type is gone for good.
    let gone = world
        .restore_handler()
        .handle(
            RestoreAssessmentCommand {
                user_id: user_id(),
                assessment_type: "phq9".to_string(),
            },
            metadata(),
        )
        .await
        .unwrap();
    assert!(!gone.success);
    assert_eq!(gone.restored_count, 0);

    // Audit: soft delete, purge, restore, newest first.
    let events = world.deletion_log.find_by_user(&user_id(), 10).await.unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].kind, DeletionKind::Restore);
    assert_eq!(events[1].kind, DeletionKind::Purge);
    assert_eq!(events[2].kind, DeletionKind::Soft);
}
