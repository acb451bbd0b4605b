//! PostgreSQL implementation of DeletionLog.
//!
//! Append-only: events are inserted and queried, never updated.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::assessment::{DeletionEvent, DeletionKind};
use crate::domain::catalog::AssessmentType;
use crate::domain::foundation::{DeletionEventId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::DeletionLog;

use super::bounded;

/// PostgreSQL implementation of DeletionLog.
#[derive(Clone)]
pub struct PostgresDeletionLog {
    pool: PgPool,
    store_timeout: Duration,
}

impl PostgresDeletionLog {
    /// Creates a new PostgresDeletionLog.
    pub fn new(pool: PgPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }
}

#[async_trait]
impl DeletionLog for PostgresDeletionLog {
    async fn append(&self, event: &DeletionEvent) -> Result<(), DomainError> {
        bounded(
            self.store_timeout,
            "append deletion event",
            sqlx::query(
                r#"
                INSERT INTO deletion_events (
                    id, user_id, assessment_type, kind, reason,
                    affected_count, occurred_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(event.id.as_uuid())
            .bind(event.user_id.as_str())
            .bind(event.assessment_type.map(|t| t.code()))
            .bind(event.kind.as_str())
            .bind(event.reason.as_deref())
            .bind(event.affected_count as i32)
            .bind(event.occurred_at.as_datetime())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<DeletionEvent>, DomainError> {
        let rows = bounded(
            self.store_timeout,
            "fetch deletion events",
            sqlx::query(
                r#"
                SELECT id, user_id, assessment_type, kind, reason,
                       affected_count, occurred_at
                FROM deletion_events
                WHERE user_id = $1
                ORDER BY occurred_at DESC
                LIMIT $2
                "#,
            )
            .bind(user_id.as_str())
            .bind(limit as i64)
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter().map(row_to_event).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_event(row: sqlx::postgres::PgRow) -> Result<DeletionEvent, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to get id: {}", e))
    })?;

    let user_id: String = row.try_get("user_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get user_id: {}", e),
        )
    })?;

    let type_code: Option<String> = row.try_get("assessment_type").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get assessment_type: {}", e),
        )
    })?;
    let assessment_type = match type_code {
        Some(code) => Some(AssessmentType::parse(&code).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid assessment type: {}", code),
            )
        })?),
        None => None,
    };

    let kind_str: String = row.try_get("kind").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get kind: {}", e),
        )
    })?;
    let kind = DeletionKind::from_str_opt(&kind_str).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid deletion kind: {}", kind_str),
        )
    })?;

    let reason: Option<String> = row.try_get("reason").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get reason: {}", e),
        )
    })?;

    let affected_count: i32 = row.try_get("affected_count").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get affected_count: {}", e),
        )
    })?;

    let occurred_at: chrono::DateTime<chrono::Utc> = row.try_get("occurred_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get occurred_at: {}", e),
        )
    })?;

    Ok(DeletionEvent {
        id: DeletionEventId::from_uuid(id),
        user_id: UserId::new(user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
        })?,
        assessment_type,
        kind,
        reason,
        affected_count: affected_count.max(0) as u32,
        occurred_at: Timestamp::from_datetime(occurred_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletion_kind_strings_roundtrip() {
        for kind in [
            DeletionKind::Soft,
            DeletionKind::Permanent,
            DeletionKind::Restore,
            DeletionKind::Purge,
        ] {
            assert_eq!(DeletionKind::from_str_opt(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn deletion_kind_rejects_unknown_strings() {
        assert_eq!(DeletionKind::from_str_opt("vanished"), None);
    }
}
