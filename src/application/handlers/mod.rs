//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod lifecycle;
pub mod snapshot;

pub use lifecycle::{
    // Deletion
    AffectedAssessments, DeleteAllAssessmentsCommand, DeleteAllAssessmentsHandler,
    DeleteAllAssessmentsResult, DeleteAssessmentCommand, DeleteAssessmentHandler,
    DeleteAssessmentResult,
    // Restoration
    CanRestoreQuery, RestoreAssessmentCommand, RestoreAssessmentHandler, RestoreAssessmentResult,
    // Read views
    ActiveAssessmentOverview, AssessmentSummary, DeletedAssessmentOverview,
    GetDeletionHistoryHandler, GetDeletionHistoryQuery, GetSummaryHandler, GetSummaryQuery,
    ProfileOverview,
    // Grace-period sweep
    SweepExpiredHandler, SweepOutcome,
};
pub use snapshot::{GetSnapshotHandler, GetSnapshotQuery};
