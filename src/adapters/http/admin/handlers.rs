//! HTTP handlers for the admin area.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::payments::dto::OrderResponse;
use crate::adapters::http::state::AppState;
use crate::application::handlers::admin::{
    ChangeUserRoleCommand, ListRecentOrdersQuery, ListUsersQuery,
};
use crate::application::handlers::content::{
    ContentEdit, CreateContentCommand, EditContentCommand,
};
use crate::domain::foundation::{ContentId, UserId};
use crate::ports::Page;

use super::dto::{
    AnalyticsResponse, ChangeRoleRequest, ContentKindParams, ContentRequest, ContentResponse, CreateContentRequest,
    LimitParams, ListUsersParams, UserResponse,
};

/// GET /api/admin/analytics
pub async fn analytics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.stats_handler().handle().await?;
    Ok(Json(AnalyticsResponse {
        total_users: stats.total_users(),
        stats,
    }))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state
        .list_users_handler()
        .handle(ListUsersQuery {
            role: params.role,
            page: Page::new(params.limit, params.offset),
        })
        .await?;
    let body: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(body))
}

/// PUT /api/admin/users/:id/role
pub async fn change_role(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(user_id): Path<String>,
    Json(request): Json<ChangeRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .change_role_handler()
        .handle(ChangeUserRoleCommand {
            caller,
            user_id: UserId::new(user_id)?,
            role: request.role,
        })
        .await?;
    Ok(Json(UserResponse::from(&account)))
}

/// GET /api/admin/orders
pub async fn recent_orders(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .recent_orders_handler()
        .handle(ListRecentOrdersQuery {
            limit: params.limit,
        })
        .await?;
    let body: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(Json(body))
}

// ════════════════════════════════════════════════════════════════════════════════
// Content management
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/content?kind=post - drafts included
pub async fn list_content(
    State(state): State<AppState>,
    Query(params): Query<ContentKindParams>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.list_content_handler().handle(params.kind).await?;
    let body: Vec<ContentResponse> = items.iter().map(ContentResponse::from).collect();
    Ok(Json(body))
}

/// POST /api/admin/content
pub async fn create_content(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<CreateContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .create_content_handler()
        .handle(CreateContentCommand {
            caller,
            kind: request.kind,
            slug: request.slug,
            draft: request.content.into(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ContentResponse::from(&item))))
}

async fn apply_content_edit(
    state: &AppState,
    id: ContentId,
    edit: ContentEdit,
) -> Result<Json<ContentResponse>, ApiError> {
    let item = state
        .edit_content_handler()
        .handle(EditContentCommand { id, edit })
        .await?;
    Ok(Json(ContentResponse::from(&item)))
}

/// PUT /api/admin/content/:id
pub async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
    Json(request): Json<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    apply_content_edit(&state, id, ContentEdit::Revise(request.into())).await
}

/// POST /api/admin/content/:id/publish
pub async fn publish_content(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
) -> Result<impl IntoResponse, ApiError> {
    apply_content_edit(&state, id, ContentEdit::Publish).await
}

/// POST /api/admin/content/:id/unpublish
pub async fn unpublish_content(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
) -> Result<impl IntoResponse, ApiError> {
    apply_content_edit(&state, id, ContentEdit::Unpublish).await
}

/// DELETE /api/admin/content/:id
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
) -> Result<impl IntoResponse, ApiError> {
    state.delete_content_handler().handle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
