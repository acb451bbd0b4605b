//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session validation (OIDC provider plus a test mock)
//! - `http` - REST API surface
//! - `memory` - In-memory store implementations for tests
//! - `postgres` - Durable stores backed by PostgreSQL
//! - `redis` - Snapshot cache backed by Redis

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod redis;
