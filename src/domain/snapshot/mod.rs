//! Wellness snapshot derivation.
//!
//! A snapshot is a pure function of a user's active assessment records:
//! the latest record per assessment type becomes one dimension, and the
//! set of dimensions determines overall confidence. Snapshots are never
//! stored as source of truth; they are recomputed on demand and cached.

mod aggregator;
mod model;

pub use aggregator::{
    derive_snapshot, FRESH_WITHIN_DAYS, HIGH_CONFIDENCE_MIN_DIMENSIONS, STALE_AFTER_DAYS,
};
pub use model::{SnapshotConfidence, SnapshotDimension, WellnessSnapshot, SNAPSHOT_VERSION};
