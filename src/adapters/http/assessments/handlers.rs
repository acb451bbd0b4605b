//! HTTP handlers for assessment lifecycle endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    CanRestoreQuery, DeleteAllAssessmentsCommand, DeleteAllAssessmentsHandler,
    DeleteAssessmentCommand, DeleteAssessmentHandler, GetDeletionHistoryHandler,
    GetDeletionHistoryQuery, GetSnapshotHandler, GetSnapshotQuery, GetSummaryHandler,
    GetSummaryQuery, RestoreAssessmentCommand, RestoreAssessmentHandler,
};
use crate::domain::assessment::AssessmentError;
use crate::domain::foundation::{CommandMetadata, ErrorCode};

use super::dto::{
    CanRestoreResponse, DeleteAllAssessmentsRequest, DeleteAllAssessmentsResponse,
    DeleteAssessmentRequest, DeleteAssessmentResponse, ErrorResponse, RestoreAssessmentResponse,
    SummaryParams, SummaryResponse,
};

/// Audit entries attached to a summary when deleted records are requested.
const SUMMARY_HISTORY_LIMIT: usize = 50;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AssessmentsHandlers {
    delete_handler: Arc<DeleteAssessmentHandler>,
    delete_all_handler: Arc<DeleteAllAssessmentsHandler>,
    restore_handler: Arc<RestoreAssessmentHandler>,
    summary_handler: Arc<GetSummaryHandler>,
    history_handler: Arc<GetDeletionHistoryHandler>,
    snapshot_handler: Arc<GetSnapshotHandler>,
}

impl AssessmentsHandlers {
    pub fn new(
        delete_handler: Arc<DeleteAssessmentHandler>,
        delete_all_handler: Arc<DeleteAllAssessmentsHandler>,
        restore_handler: Arc<RestoreAssessmentHandler>,
        summary_handler: Arc<GetSummaryHandler>,
        history_handler: Arc<GetDeletionHistoryHandler>,
        snapshot_handler: Arc<GetSnapshotHandler>,
    ) -> Self {
        Self {
            delete_handler,
            delete_all_handler,
            restore_handler,
            summary_handler,
            history_handler,
            snapshot_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// DELETE /api/assessments/:type - Delete every record of one assessment type.
///
/// Logical outcomes ("not found", "already soft deleted") come back as 200
/// with `success` in the body; only a type outside the catalog is a 400.
pub async fn delete_assessment(
    State(handlers): State<AssessmentsHandlers>,
    RequireAuth(user): RequireAuth,
    Path(assessment_type): Path<String>,
    Json(req): Json<DeleteAssessmentRequest>,
) -> Response {
    let cmd = DeleteAssessmentCommand {
        user_id: user.id.clone(),
        assessment_type,
        cascade: req.cascade,
        permanent: req.permanent,
        reason: req.reason,
    };

    let metadata = CommandMetadata::new(user.id).with_correlation_id("http-request");

    match handlers.delete_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let response = DeleteAssessmentResponse::from(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_assessment_error(e),
    }
}

/// DELETE /api/assessments - Delete every assessment the caller has.
///
/// The soft path requires the confirmation phrase; without it the handler
/// rejects before touching storage and this maps to a 400.
pub async fn delete_all_assessments(
    State(handlers): State<AssessmentsHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<DeleteAllAssessmentsRequest>,
) -> Response {
    let cmd = DeleteAllAssessmentsCommand {
        user_id: user.id.clone(),
        permanent: req.permanent,
        reason: req.reason,
        confirmation: req.confirmation,
    };

    let metadata = CommandMetadata::new(user.id).with_correlation_id("http-request");

    match handlers.delete_all_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let response = DeleteAllAssessmentsResponse::from(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_assessment_error(e),
    }
}

/// POST /api/assessments/:type/restore - Restore the newest soft-deleted record.
///
/// A restore that cannot proceed (outside grace, nothing soft-deleted) is a
/// 400 carrying the outcome body, so callers see both the status and why.
pub async fn restore_assessment(
    State(handlers): State<AssessmentsHandlers>,
    RequireAuth(user): RequireAuth,
    Path(assessment_type): Path<String>,
) -> Response {
    let cmd = RestoreAssessmentCommand {
        user_id: user.id.clone(),
        assessment_type,
    };

    let metadata = CommandMetadata::new(user.id).with_correlation_id("http-request");

    match handlers.restore_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let status = if result.success {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            };
            let response = RestoreAssessmentResponse::from(result);
            (status, Json(response)).into_response()
        }
        Err(e) => handle_assessment_error(e),
    }
}

/// GET /api/assessments/:type/can-restore - Whether a restore would succeed now.
pub async fn can_restore_assessment(
    State(handlers): State<AssessmentsHandlers>,
    RequireAuth(user): RequireAuth,
    Path(assessment_type): Path<String>,
) -> Response {
    let query = CanRestoreQuery {
        user_id: user.id,
        assessment_type,
    };

    match handlers.restore_handler.can_restore(query).await {
        Ok(can_restore) => {
            (StatusCode::OK, Json(CanRestoreResponse { can_restore })).into_response()
        }
        Err(e) => handle_assessment_error(e),
    }
}

/// GET /api/assessments/summary - Lifecycle view of the caller's assessments.
///
/// `?include_deleted=true` adds soft-deleted records with their grace
/// countdown plus the recent deletion history.
pub async fn get_assessment_summary(
    State(handlers): State<AssessmentsHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<SummaryParams>,
) -> Response {
    let query = GetSummaryQuery {
        user_id: user.id.clone(),
        include_deleted: params.include_deleted,
    };

    let metadata = CommandMetadata::new(user.id.clone()).with_correlation_id("http-request");

    let summary = match handlers.summary_handler.handle(query, metadata).await {
        Ok(summary) => summary,
        Err(e) => return handle_assessment_error(e),
    };
    let mut response = SummaryResponse::from(summary);

    if params.include_deleted {
        let history_query = GetDeletionHistoryQuery {
            user_id: user.id.clone(),
            limit: SUMMARY_HISTORY_LIMIT,
        };
        let metadata = CommandMetadata::new(user.id).with_correlation_id("http-request");
        match handlers.history_handler.handle(history_query, metadata).await {
            Ok(events) => {
                response.deletion_history = Some(events.into_iter().map(Into::into).collect());
            }
            Err(e) => return handle_assessment_error(e),
        }
    }

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/assessments/snapshot - Derived wellness snapshot.
///
/// `None` from the handler means nothing has been assessed yet; that is a
/// 404, distinct from an empty-but-present snapshot.
pub async fn get_wellness_snapshot(
    State(handlers): State<AssessmentsHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = GetSnapshotQuery {
        user_id: user.id.clone(),
    };

    let metadata = CommandMetadata::new(user.id.clone()).with_correlation_id("http-request");

    match handlers.snapshot_handler.handle(query, metadata).await {
        Ok(Some(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(
                "Wellness snapshot",
                &user.id.to_string(),
            )),
        )
            .into_response(),
        Err(e) => handle_assessment_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_assessment_error(error: AssessmentError) -> Response {
    match error.code() {
        ErrorCode::UnknownAssessmentType
        | ErrorCode::ValidationFailed
        | ErrorCode::ConfirmationRequired => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.message())),
        )
            .into_response(),
        ErrorCode::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::forbidden(error.message())),
        )
            .into_response(),
        ErrorCode::DatabaseError | ErrorCode::CacheError | ErrorCode::Timeout => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::unavailable(error.message())),
        )
            .into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal("An unexpected error occurred")),
        )
            .into_response(),
    }
}
