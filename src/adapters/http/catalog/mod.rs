//! HTTP adapter for the public catalog and free enrollment.
//!
//! - `GET /api/courses` - published courses, optional `level` filter
//! - `GET /api/courses/:slug` - course page (drafts visible to owner/admin)
//! - `POST /api/courses/:id/enroll` - free course enrollment
//! - `GET /api/webinars` - upcoming webinars
//! - `GET /api/webinars/:slug` - webinar page
//! - `POST /api/webinars/:slug/register` - free webinar registration

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::catalog_routes;
