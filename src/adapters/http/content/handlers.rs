//! HTTP handlers for published content.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use crate::adapters::http::admin::dto::ContentResponse;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::domain::content::ContentKind;

/// GET /api/posts
pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.published_posts_handler().handle().await?;
    let body: Vec<ContentResponse> = posts.iter().map(ContentResponse::from).collect();
    Ok(Json(body))
}

/// GET /api/posts/:slug
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .published_content_handler()
        .handle(ContentKind::Post, &slug)
        .await?;
    Ok(Json(ContentResponse::from(&post)))
}

/// GET /api/pages/:slug
pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .published_content_handler()
        .handle(ContentKind::Page, &slug)
        .await?;
    Ok(Json(ContentResponse::from(&page)))
}
