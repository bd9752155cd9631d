//! Axum router for account endpoints.

use axum::{routing::get, Router};

use crate::adapters::http::state::AppState;

use super::handlers::{get_me, sync_profile};

/// Account routes, relative to `/api/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).post(sync_profile))
}
