//! Lifecycle handlers.
//!
//! One handler per lifecycle operation: deletion (individual and bulk),
//! restoration, the read-only summary and audit views, and the periodic
//! grace-period sweep. All of them share the cascade helpers that keep the
//! derived per-user aggregates consistent with the record states.

mod cascade;

pub mod delete_all_assessments;
pub mod delete_assessment;
pub mod get_deletion_history;
pub mod get_summary;
pub mod restore_assessment;
pub mod sweep_expired;

pub use delete_all_assessments::{
    DeleteAllAssessmentsCommand, DeleteAllAssessmentsHandler, DeleteAllAssessmentsResult,
};
pub use delete_assessment::{
    AffectedAssessments, DeleteAssessmentCommand, DeleteAssessmentHandler, DeleteAssessmentResult,
};
pub use get_deletion_history::{GetDeletionHistoryHandler, GetDeletionHistoryQuery};
pub use get_summary::{
    ActiveAssessmentOverview, AssessmentSummary, DeletedAssessmentOverview, GetSummaryHandler,
    GetSummaryQuery, ProfileOverview,
};
pub use restore_assessment::{
    CanRestoreQuery, RestoreAssessmentCommand, RestoreAssessmentHandler, RestoreAssessmentResult,
};
pub use sweep_expired::{SweepExpiredHandler, SweepOutcome};
