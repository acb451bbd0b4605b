//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `oidc` - Production OIDC JWT validation against the provider's JWKS
//! - `mock` - Test implementation that doesn't require an identity provider

mod mock;
mod oidc;

pub use mock::MockSessionValidator;
pub use oidc::{OidcConfig, OidcSessionValidator};
