//! Axum router for admin endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    analytics, change_role, create_content, delete_content, list_content, list_users,
    publish_content, recent_orders, unpublish_content, update_content,
};

/// Admin routes, relative to `/api/admin`. Gated to the admin role by the
/// router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(analytics))
        .route("/users", get(list_users))
        .route("/users/:id/role", put(change_role))
        .route("/orders", get(recent_orders))
        .route("/content", get(list_content).post(create_content))
        .route("/content/:id", put(update_content).delete(delete_content))
        .route("/content/:id/publish", post(publish_content))
        .route("/content/:id/unpublish", post(unpublish_content))
}
