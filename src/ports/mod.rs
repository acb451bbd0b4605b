//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `AssessmentStore` - Assessment records and their lifecycle transitions
//! - `ProfileStore` - Derived per-user profile and overall rollup rows
//! - `DeletionLog` - Append-only deletion/restore/purge audit trail
//!
//! ## Cache Ports
//!
//! - `SnapshotCache` - TTL cache for derived wellness snapshots
//!
//! ## Auth Ports
//!
//! - `SessionValidator` - Bearer token validation and identity extraction

mod assessment_store;
mod deletion_log;
mod profile_store;
mod session_validator;
mod snapshot_cache;

pub use assessment_store::AssessmentStore;
pub use deletion_log::DeletionLog;
pub use profile_store::ProfileStore;
pub use session_validator::SessionValidator;
pub use snapshot_cache::SnapshotCache;
