//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `catalog` - The fixed instrument catalog (assessment types, severity bands)
//! - `assessment` - Assessment record lifecycle and per-user profile rollups
//! - `snapshot` - Pure derivation of wellness snapshots from active assessments

pub mod assessment;
pub mod catalog;
pub mod foundation;
pub mod snapshot;
