//! Top-level router assembly.
//!
//! Role gating happens once per prefix: `auth_middleware` runs for every
//! request and attaches the caller, then `require_role` guards the
//! `/api/instructor`, `/api/student` and `/api/admin` groups.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::domain::foundation::Role;

use super::admin::admin_routes;
use super::catalog::catalog_routes;
use super::content::content_routes;
use super::instructor::instructor_routes;
use super::learning::{progress_routes, student_routes};
use super::middleware::{auth_middleware, require_role, AuthState};
use super::payments::{payment_routes, webhook_routes};
use super::state::AppState;
use super::users::user_routes;

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Routes under `/api`, before state is attached.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(progress_routes())
        .merge(content_routes())
        .nest("/users", user_routes())
        .nest("/payments", payment_routes())
        .nest("/webhooks", webhook_routes())
        .nest(
            "/instructor",
            instructor_routes().route_layer(from_fn_with_state(Role::Instructor, require_role)),
        )
        .nest(
            "/student",
            student_routes().route_layer(from_fn_with_state(Role::Student, require_role)),
        )
        .nest(
            "/admin",
            admin_routes().route_layer(from_fn_with_state(Role::Admin, require_role)),
        )
}

/// Builds the complete application router.
pub fn build_router(state: AppState, validator: AuthState, server: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(server))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(from_fn_with_state(validator, auth_middleware))
        .layer(middleware)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() && !server.is_production() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
