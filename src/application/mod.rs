//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Lifecycle commands
    DeleteAllAssessmentsCommand, DeleteAllAssessmentsHandler, DeleteAllAssessmentsResult,
    DeleteAssessmentCommand, DeleteAssessmentHandler, DeleteAssessmentResult,
    RestoreAssessmentCommand, RestoreAssessmentHandler, RestoreAssessmentResult,
    // Lifecycle queries
    AssessmentSummary, CanRestoreQuery, GetDeletionHistoryHandler, GetDeletionHistoryQuery,
    GetSummaryHandler, GetSummaryQuery,
    // Sweep job
    SweepExpiredHandler, SweepOutcome,
    // Snapshot query
    GetSnapshotHandler, GetSnapshotQuery,
};
