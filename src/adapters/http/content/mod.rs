//! HTTP adapter for public blog posts and pages.
//!
//! - `GET /api/posts` - published posts, newest first
//! - `GET /api/posts/:slug`
//! - `GET /api/pages/:slug`
//!
//! Authoring lives in the admin area.

pub mod handlers;
pub mod routes;

pub use routes::content_routes;
