//! HTTP routes for assessment lifecycle endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    can_restore_assessment, delete_all_assessments, delete_assessment, get_assessment_summary,
    get_wellness_snapshot, restore_assessment, AssessmentsHandlers,
};

/// Creates the assessments router with all endpoints.
pub fn assessments_routes(handlers: AssessmentsHandlers) -> Router {
    Router::new()
        .route("/", delete(delete_all_assessments))
        .route("/summary", get(get_assessment_summary))
        .route("/snapshot", get(get_wellness_snapshot))
        .route("/:assessment_type", delete(delete_assessment))
        .route("/:assessment_type/restore", post(restore_assessment))
        .route("/:assessment_type/can-restore", get(can_restore_assessment))
        .with_state(handlers)
}
