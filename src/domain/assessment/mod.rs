//! Assessment lifecycle domain module.
//!
//! Owns the record aggregate and its soft-delete / restore / purge state
//! machine, the derived per-user profile, the pure recompute that keeps
//! the profile honest, and the append-only deletion audit trail.
//!
//! # Lifecycle
//!
//! ```text
//! Active ──────────────► SoftDeleted ──────────► PermanentlyDeleted
//!   │        delete         │    restore ▲           (terminal)
//!   │                       └────────────┘
//!   └────────────────────── permanent delete ──────────────► ▲
//! ```
//!
//! Restoration is only valid within the 30-day grace period; the sweeper
//! purges whatever outlives it.

mod deletion_event;
mod errors;
mod profile;
mod record;
mod rollup;

pub use deletion_event::{DeletionEvent, DeletionKind};
pub use errors::AssessmentError;
pub use profile::{RiskLevel, UserAssessmentProfile};
pub use record::{
    AssessmentRecord, LifecycleState, LifecycleStateKind, QuestionResponse, GRACE_PERIOD_DAYS,
    MAX_TITLE_LENGTH,
};
pub use rollup::{
    latest_active_per_type, recompute_from_records, DimensionRollup, ProfileRecompute,
};
