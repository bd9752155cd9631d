//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware, role gate and extractors

pub mod auth;

pub use auth::{auth_middleware, require_role, AuthRejection, AuthState, OptionalAuth, RequireAuth};
