//! Snapshot handlers.

pub mod get_snapshot;

pub use get_snapshot::{GetSnapshotHandler, GetSnapshotQuery};
