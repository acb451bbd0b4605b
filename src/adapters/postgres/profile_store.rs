//! PostgreSQL implementation of ProfileStore.
//!
//! The profile row and its dimension rollups live in separate tables;
//! `replace_rollups` swaps the whole rollup set in one transaction so
//! readers never observe a half-replaced mix.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::assessment::{DimensionRollup, RiskLevel, UserAssessmentProfile};
use crate::domain::catalog::DimensionLevel;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::ProfileStore;

use super::bounded;

/// PostgreSQL implementation of ProfileStore.
#[derive(Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
    store_timeout: Duration,
}

impl PostgresProfileStore {
    /// Creates a new PostgresProfileStore.
    pub fn new(pool: PgPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserAssessmentProfile>, DomainError> {
        let row = bounded(
            self.store_timeout,
            "fetch profile",
            sqlx::query(
                r#"
                SELECT user_id, risk_level, primary_concerns, recommended_approach,
                       last_assessed_at, updated_at
                FROM user_assessment_profiles
                WHERE user_id = $1
                "#,
            )
            .bind(user_id.as_str())
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_profile(row)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, profile: &UserAssessmentProfile) -> Result<(), DomainError> {
        bounded(
            self.store_timeout,
            "upsert profile",
            sqlx::query(
                r#"
                INSERT INTO user_assessment_profiles (
                    user_id, risk_level, primary_concerns, recommended_approach,
                    last_assessed_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (user_id) DO UPDATE SET
                    risk_level = EXCLUDED.risk_level,
                    primary_concerns = EXCLUDED.primary_concerns,
                    recommended_approach = EXCLUDED.recommended_approach,
                    last_assessed_at = EXCLUDED.last_assessed_at,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(profile.user_id().as_str())
            .bind(profile.risk_level().as_str())
            .bind(profile.primary_concerns())
            .bind(profile.recommended_approach())
            .bind(profile.last_assessed_at().map(|t| *t.as_datetime()))
            .bind(profile.updated_at().as_datetime())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn replace_rollups(
        &self,
        user_id: &UserId,
        rollups: &[DimensionRollup],
    ) -> Result<(), DomainError> {
        let mut tx = bounded(
            self.store_timeout,
            "open rollup transaction",
            self.pool.begin(),
        )
        .await?;

        bounded(
            self.store_timeout,
            "clear rollups",
            sqlx::query("DELETE FROM assessment_rollups WHERE user_id = $1")
                .bind(user_id.as_str())
                .execute(&mut *tx),
        )
        .await?;

        for rollup in rollups {
            bounded(
                self.store_timeout,
                "insert rollup",
                sqlx::query(
                    r#"
                    INSERT INTO assessment_rollups (
                        user_id, dimension_key, level, score, max_score, computed_at
                    ) VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(user_id.as_str())
                .bind(&rollup.dimension_key)
                .bind(rollup.level.as_str())
                .bind(rollup.score)
                .bind(rollup.max_score)
                .bind(rollup.computed_at.as_datetime())
                .execute(&mut *tx),
            )
            .await?;
        }

        bounded(self.store_timeout, "commit rollups", tx.commit()).await?;

        Ok(())
    }

    async fn find_rollups(&self, user_id: &UserId) -> Result<Vec<DimensionRollup>, DomainError> {
        let rows = bounded(
            self.store_timeout,
            "fetch rollups",
            sqlx::query(
                r#"
                SELECT dimension_key, level, score, max_score, computed_at
                FROM assessment_rollups
                WHERE user_id = $1
                ORDER BY dimension_key
                "#,
            )
            .bind(user_id.as_str())
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter().map(row_to_rollup).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_profile(row: sqlx::postgres::PgRow) -> Result<UserAssessmentProfile, DomainError> {
    let user_id: String = row.try_get("user_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get user_id: {}", e),
        )
    })?;

    let risk_str: String = row.try_get("risk_level").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get risk_level: {}", e),
        )
    })?;
    let risk_level = RiskLevel::from_str_opt(&risk_str).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid risk level: {}", risk_str),
        )
    })?;

    let primary_concerns: Vec<String> = row.try_get("primary_concerns").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get primary_concerns: {}", e),
        )
    })?;

    let recommended_approach: Option<String> =
        row.try_get("recommended_approach").map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get recommended_approach: {}", e),
            )
        })?;

    let last_assessed_at: Option<chrono::DateTime<chrono::Utc>> =
        row.try_get("last_assessed_at").map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get last_assessed_at: {}", e),
            )
        })?;

    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get updated_at: {}", e),
        )
    })?;

    Ok(UserAssessmentProfile::reconstitute(
        UserId::new(user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
        })?,
        last_assessed_at.map(Timestamp::from_datetime),
        risk_level,
        primary_concerns,
        recommended_approach,
        Timestamp::from_datetime(updated_at),
    ))
}

fn row_to_rollup(row: sqlx::postgres::PgRow) -> Result<DimensionRollup, DomainError> {
    let dimension_key: String = row.try_get("dimension_key").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get dimension_key: {}", e),
        )
    })?;

    let level_str: String = row.try_get("level").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get level: {}", e),
        )
    })?;
    let level = DimensionLevel::from_str_opt(&level_str).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid dimension level: {}", level_str),
        )
    })?;

    let score: i32 = row.try_get("score").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get score: {}", e),
        )
    })?;

    let max_score: i32 = row.try_get("max_score").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get max_score: {}", e),
        )
    })?;

    let computed_at: chrono::DateTime<chrono::Utc> = row.try_get("computed_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get computed_at: {}", e),
        )
    })?;

    Ok(DimensionRollup {
        dimension_key,
        level,
        score,
        max_score,
        computed_at: Timestamp::from_datetime(computed_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_strings_roundtrip() {
        for level in [
            RiskLevel::Low,
            RiskLevel::Moderate,
            RiskLevel::Elevated,
            RiskLevel::High,
        ] {
            assert_eq!(RiskLevel::from_str_opt(level.as_str()), Some(level));
        }
    }

    #[test]
    fn dimension_level_strings_roundtrip() {
        for level in [
            DimensionLevel::Low,
            DimensionLevel::Mild,
            DimensionLevel::Moderate,
            DimensionLevel::High,
        ] {
            assert_eq!(DimensionLevel::from_str_opt(level.as_str()), Some(level));
        }
    }
}
