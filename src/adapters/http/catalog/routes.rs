//! Axum router for catalog endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    enroll, get_course, get_webinar, list_courses, list_webinars, register,
};

/// Public catalog routes, mounted under `/api`.
///
/// Course routes share the `:course` segment name with the learning area;
/// it holds a slug for reads and an id for writes.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/:course", get(get_course))
        .route("/courses/:course/enroll", post(enroll))
        .route("/webinars", get(list_webinars))
        .route("/webinars/:slug", get(get_webinar))
        .route("/webinars/:slug/register", post(register))
}
