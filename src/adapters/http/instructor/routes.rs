//! Axum router for instructor endpoints.

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    add_lesson, add_module, archive_course, cancel_webinar, complete_webinar, create_course,
    create_webinar, delete_course, list_own_courses, list_own_webinars, publish_course,
    remove_lesson, remove_module, rename_module, reorder_lessons, reschedule_webinar,
    start_webinar, unpublish_course, update_course, update_lesson,
};

/// Authoring routes, relative to `/api/instructor`.
///
/// The caller is gated to instructor-or-admin by the router; ownership of
/// each course or webinar is checked per request.
pub fn instructor_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_own_courses).post(create_course))
        .route("/courses/:course", patch(update_course).delete(delete_course))
        .route("/courses/:course/publish", post(publish_course))
        .route("/courses/:course/unpublish", post(unpublish_course))
        .route("/courses/:course/archive", post(archive_course))
        .route("/courses/:course/modules", post(add_module))
        .route(
            "/courses/:course/modules/:module",
            patch(rename_module).delete(remove_module),
        )
        .route("/courses/:course/modules/:module/lessons", post(add_lesson))
        .route("/courses/:course/modules/:module/order", put(reorder_lessons))
        .route(
            "/courses/:course/lessons/:lesson",
            put(update_lesson).delete(remove_lesson),
        )
        .route("/webinars", get(list_own_webinars).post(create_webinar))
        .route("/webinars/:webinar", put(reschedule_webinar))
        .route("/webinars/:webinar/live", post(start_webinar))
        .route("/webinars/:webinar/complete", post(complete_webinar))
        .route("/webinars/:webinar/cancel", post(cancel_webinar))
}
