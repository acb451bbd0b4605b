//! PostgreSQL implementation of AssessmentStore.
//!
//! Lifecycle transitions are conditional updates keyed on the current
//! state column, so concurrent operations on the same record resolve by
//! whichever commit lands first. Purged rows are physically removed.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::assessment::{
    AssessmentRecord, LifecycleState, LifecycleStateKind, QuestionResponse,
};
use crate::domain::catalog::{AssessmentType, SeverityBand};
use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AssessmentStore;

use super::bounded;

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, assessment_type, title, score, severity_band,
           responses, structured_result, taken_at, lifecycle_state,
           deleted_at, deletion_reason
    FROM assessment_records
"#;

/// PostgreSQL implementation of AssessmentStore.
#[derive(Clone)]
pub struct PostgresAssessmentStore {
    pool: PgPool,
    store_timeout: Duration,
}

impl PostgresAssessmentStore {
    /// Creates a new PostgresAssessmentStore.
    pub fn new(pool: PgPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }
}

#[async_trait]
impl AssessmentStore for PostgresAssessmentStore {
    async fn insert(&self, record: &AssessmentRecord) -> Result<(), DomainError> {
        let responses = serde_json::to_value(record.responses()).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to serialize responses: {}", e),
            )
        })?;

        bounded(
            self.store_timeout,
            "insert assessment",
            sqlx::query(
                r#"
                INSERT INTO assessment_records (
                    id, user_id, assessment_type, title, score, severity_band,
                    responses, structured_result, taken_at, lifecycle_state,
                    deleted_at, deletion_reason
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(record.id().as_uuid())
            .bind(record.user_id().as_str())
            .bind(record.assessment_type().code())
            .bind(record.title())
            .bind(record.score())
            .bind(record.severity_band().map(|b| b.as_str()))
            .bind(responses)
            .bind(record.structured_result().clone())
            .bind(record.taken_at().as_datetime())
            .bind(record.state_kind().as_str())
            .bind(record.deleted_at().map(|t| *t.as_datetime()))
            .bind(record.deletion_reason())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<AssessmentRecord>, DomainError> {
        let rows = bounded(
            self.store_timeout,
            "fetch assessments by user",
            sqlx::query(&format!(
                "{} WHERE user_id = $1 ORDER BY taken_at DESC",
                SELECT_COLUMNS
            ))
            .bind(user_id.as_str())
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter().map(row_to_assessment_record).collect()
    }

    async fn find_by_user_and_type(
        &self,
        user_id: &UserId,
        assessment_type: AssessmentType,
    ) -> Result<Vec<AssessmentRecord>, DomainError> {
        let rows = bounded(
            self.store_timeout,
            "fetch assessments by type",
            sqlx::query(&format!(
                "{} WHERE user_id = $1 AND assessment_type = $2 ORDER BY taken_at DESC",
                SELECT_COLUMNS
            ))
            .bind(user_id.as_str())
            .bind(assessment_type.code())
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter().map(row_to_assessment_record).collect()
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AssessmentRecord>, DomainError> {
        let rows = bounded(
            self.store_timeout,
            "fetch active assessments",
            sqlx::query(&format!(
                "{} WHERE user_id = $1 AND lifecycle_state = 'active' ORDER BY taken_at DESC",
                SELECT_COLUMNS
            ))
            .bind(user_id.as_str())
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter().map(row_to_assessment_record).collect()
    }

    async fn soft_delete(
        &self,
        id: &AssessmentId,
        deleted_at: Timestamp,
        reason: Option<&str>,
    ) -> Result<bool, DomainError> {
        let result = bounded(
            self.store_timeout,
            "soft delete assessment",
            sqlx::query(
                r#"
                UPDATE assessment_records SET
                    lifecycle_state = 'soft_deleted',
                    deleted_at = $2,
                    deletion_reason = $3
                WHERE id = $1 AND lifecycle_state = 'active'
                "#,
            )
            .bind(id.as_uuid())
            .bind(deleted_at.as_datetime())
            .bind(reason)
            .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn restore(&self, id: &AssessmentId) -> Result<bool, DomainError> {
        let result = bounded(
            self.store_timeout,
            "restore assessment",
            sqlx::query(
                r#"
                UPDATE assessment_records SET
                    lifecycle_state = 'active',
                    deleted_at = NULL,
                    deletion_reason = NULL
                WHERE id = $1 AND lifecycle_state = 'soft_deleted'
                "#,
            )
            .bind(id.as_uuid())
            .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn purge(&self, id: &AssessmentId) -> Result<bool, DomainError> {
        let result = bounded(
            self.store_timeout,
            "purge assessment",
            sqlx::query("DELETE FROM assessment_records WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_soft_deleted_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<AssessmentRecord>, DomainError> {
        let rows = bounded(
            self.store_timeout,
            "scan expired soft deletions",
            sqlx::query(&format!(
                "{} WHERE lifecycle_state = 'soft_deleted' AND deleted_at < $1",
                SELECT_COLUMNS
            ))
            .bind(cutoff.as_datetime())
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter().map(row_to_assessment_record).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_assessment_record(row: sqlx::postgres::PgRow) -> Result<AssessmentRecord, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to get id: {}", e))
    })?;

    let user_id: String = row.try_get("user_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get user_id: {}", e),
        )
    })?;

    let type_code: String = row.try_get("assessment_type").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get assessment_type: {}", e),
        )
    })?;
    let assessment_type = AssessmentType::parse(&type_code).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid assessment type: {}", type_code),
        )
    })?;

    let title: String = row.try_get("title").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get title: {}", e),
        )
    })?;

    let score: i32 = row.try_get("score").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get score: {}", e),
        )
    })?;

    let severity_str: Option<String> = row.try_get("severity_band").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get severity_band: {}", e),
        )
    })?;
    let severity_band = match severity_str {
        Some(s) => Some(SeverityBand::from_str_opt(&s).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid severity band: {}", s),
            )
        })?),
        None => None,
    };

    let responses_json: serde_json::Value = row.try_get("responses").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get responses: {}", e),
        )
    })?;
    let responses: Vec<QuestionResponse> =
        serde_json::from_value(responses_json).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to parse responses: {}", e),
            )
        })?;

    let structured_result: serde_json::Value = row.try_get("structured_result").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get structured_result: {}", e),
        )
    })?;

    let taken_at: chrono::DateTime<chrono::Utc> = row.try_get("taken_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get taken_at: {}", e),
        )
    })?;

    let state_str: String = row.try_get("lifecycle_state").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get lifecycle_state: {}", e),
        )
    })?;
    let state_kind = LifecycleStateKind::from_str_opt(&state_str).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid lifecycle state: {}", state_str),
        )
    })?;

    let deleted_at: Option<chrono::DateTime<chrono::Utc>> =
        row.try_get("deleted_at").map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get deleted_at: {}", e),
            )
        })?;
    let deletion_reason: Option<String> = row.try_get("deletion_reason").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get deletion_reason: {}", e),
        )
    })?;

    let lifecycle = match state_kind {
        LifecycleStateKind::Active => LifecycleState::Active,
        LifecycleStateKind::SoftDeleted => {
            let deleted_at = deleted_at.ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    "Soft-deleted row is missing deleted_at".to_string(),
                )
            })?;
            LifecycleState::SoftDeleted {
                deleted_at: Timestamp::from_datetime(deleted_at),
                reason: deletion_reason,
            }
        }
        LifecycleStateKind::PermanentlyDeleted => LifecycleState::PermanentlyDeleted,
    };

    Ok(AssessmentRecord::reconstitute(
        AssessmentId::from_uuid(id),
        UserId::new(user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
        })?,
        assessment_type,
        title,
        score,
        severity_band,
        responses,
        structured_result,
        Timestamp::from_datetime(taken_at),
        lifecycle,
    ))
}
