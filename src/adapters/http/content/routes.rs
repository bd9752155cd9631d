//! Axum router for public content.

use axum::{routing::get, Router};

use crate::adapters::http::state::AppState;

use super::handlers::{get_page, get_post, list_posts};

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/:slug", get(get_post))
        .route("/pages/:slug", get(get_page))
}
