//! PostgreSQL adapters - Database implementations for persistence ports.
//!
//! Every call runs under the configured store timeout so a stalled
//! connection surfaces as a retryable failure instead of hanging the
//! operation.

mod assessment_store;
mod deletion_log;
mod profile_store;

pub use assessment_store::PostgresAssessmentStore;
pub use deletion_log::PostgresDeletionLog;
pub use profile_store::PostgresProfileStore;

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Runs a database call with a bounded timeout.
pub(crate) async fn bounded<T, F>(limit: Duration, op: &str, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", op, e))
        }),
        Err(_) => Err(DomainError::new(
            ErrorCode::Timeout,
            format!("Timed out trying to {}", op),
        )),
    }
}
