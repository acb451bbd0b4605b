//! In-memory adapters - port implementations without external services.
//!
//! Used by tests and local development. Each adapter mirrors the semantics
//! of its production counterpart, including the conditional lifecycle
//! transitions and TTL expiry.

mod assessment_store;
mod deletion_log;
mod profile_store;
mod snapshot_cache;

pub use assessment_store::InMemoryAssessmentStore;
pub use deletion_log::InMemoryDeletionLog;
pub use profile_store::InMemoryProfileStore;
pub use snapshot_cache::InMemorySnapshotCache;
