//! Axum routers for learning endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    complete_lesson, dashboard, get_progress, list_notifications, mark_notification_read,
    record_access, record_assessment,
};

/// Per-course progress routes, mounted under `/api` next to the catalog.
pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/:course/progress",
            get(get_progress).post(complete_lesson),
        )
        .route("/courses/:course/lessons/:lesson/access", post(record_access))
        .route("/courses/:course/assessments", post(record_assessment))
}

/// Student area routes, relative to `/api/student`.
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/notifications", get(list_notifications))
        .route("/notifications/:id/read", post(mark_notification_read))
}
