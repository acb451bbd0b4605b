//! HTTP adapter for assessment lifecycle endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CanRestoreResponse, DeleteAllAssessmentsRequest, DeleteAllAssessmentsResponse,
    DeleteAssessmentRequest, DeleteAssessmentResponse, DeletionEventDto, ErrorResponse,
    RestoreAssessmentResponse, SummaryParams, SummaryResponse,
};
pub use handlers::AssessmentsHandlers;
pub use routes::assessments_routes;
