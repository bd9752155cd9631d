//! HTTP adapter for the caller's own account.
//!
//! - `POST /api/users/me` - sync profile from token claims (registers on first call)
//! - `GET /api/users/me`

pub mod handlers;
pub mod routes;

pub use routes::user_routes;
