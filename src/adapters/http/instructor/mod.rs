//! HTTP adapter for instructor authoring, mounted at `/api/instructor`.
//!
//! Every route requires the instructor role or higher. Ownership of the
//! individual course or webinar is checked by the application handlers.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::instructor_routes;
