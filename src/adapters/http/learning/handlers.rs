//! HTTP handlers for progress tracking and the student area.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::learning::{
    CompleteLessonCommand, GetProgressQuery, RecordAssessmentCommand, RecordLessonAccessCommand,
};
use crate::domain::foundation::{CourseId, LessonId, NotificationId};

use super::dto::{
    AssessmentRequest, AssessmentResponse, CompleteLessonRequest, NotificationParams,
    NotificationResponse,
};

/// GET /api/courses/:id/progress
pub async fn get_progress(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .get_progress_handler()
        .handle(GetProgressQuery {
            user_id: user.id,
            course_id,
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/courses/:id/progress - idempotent lesson completion
pub async fn complete_lesson(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
    Json(request): Json<CompleteLessonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .complete_lesson_handler()
        .handle(CompleteLessonCommand {
            user_id: user.id,
            course_id,
            lesson_id: request.lesson_id,
        })
        .await?;
    Ok(Json(result.view))
}

/// POST /api/courses/:id/lessons/:lesson_id/access
pub async fn record_access(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, lesson_id)): Path<(CourseId, LessonId)>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .lesson_access_handler()
        .handle(RecordLessonAccessCommand {
            user_id: user.id,
            course_id,
            lesson_id,
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/courses/:id/assessments
pub async fn record_assessment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
    Json(request): Json<AssessmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let attempt = state
        .assessment_handler()
        .handle(RecordAssessmentCommand {
            user_id: user.id,
            course_id,
            kind: request.kind,
            reference: request.reference,
            score: request.score,
            max_score: request.max_score,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(AssessmentResponse::from(&attempt))))
}

/// GET /api/student/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = state.dashboard_handler().handle(&user.id).await?;
    Ok(Json(dashboard))
}

/// GET /api/student/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<NotificationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = state
        .notifications_handler()
        .handle(&user.id, params.limit)
        .await?;
    let body: Vec<NotificationResponse> =
        notifications.iter().map(NotificationResponse::from).collect();
    Ok(Json(body))
}

/// POST /api/student/notifications/:id/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<NotificationId>,
) -> Result<impl IntoResponse, ApiError> {
    state.mark_read_handler().handle(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
