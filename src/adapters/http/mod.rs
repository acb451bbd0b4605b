//! HTTP adapters - REST API implementations.
//!
//! The assessment lifecycle has its own HTTP adapter for endpoint exposure;
//! `middleware` carries the auth layer shared by every route.

pub mod assessments;
pub mod middleware;

// Re-export key types for convenience
pub use assessments::assessments_routes;
pub use assessments::AssessmentsHandlers;
pub use middleware::{auth_middleware, AuthState, RequireAuth};
