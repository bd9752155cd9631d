//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 access tokens from the identity provider
//! - `mock` - Fixed tokens for tests and local development

mod jwt;
mod mock;

pub use jwt::{AccessClaims, Audience, JwtConfig, JwtSessionValidator};
pub use mock::MockSessionValidator;
