//! HTTP handlers for catalog browsing and free enrollment.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::catalog::{GetCourseQuery, ListCoursesQuery};
use crate::application::handlers::commerce::{EnrollInCourseCommand, RegisterForWebinarCommand};
use crate::domain::foundation::CourseId;

use super::dto::{
    CourseResponse, CourseSummaryResponse, EnrollmentResponse, ListCoursesParams,
    RegistrationResponse, WebinarResponse,
};

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<ListCoursesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let courses = state
        .list_courses_handler()
        .handle(ListCoursesQuery {
            level: params.level,
        })
        .await?;
    let body: Vec<CourseSummaryResponse> =
        courses.iter().map(CourseSummaryResponse::from).collect();
    Ok(Json(body))
}

/// GET /api/courses/:slug
pub async fn get_course(
    State(state): State<AppState>,
    OptionalAuth(caller): OptionalAuth,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .get_course_handler()
        .handle(GetCourseQuery { slug, caller })
        .await?;
    let body = if view.content_unlocked {
        CourseResponse::from(&view.course)
    } else {
        CourseResponse::outline(&view.course)
    };
    Ok(Json(body))
}

/// POST /api/courses/:id/enroll
pub async fn enroll(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .enroll_handler()
        .handle(EnrollInCourseCommand {
            user_id: user.id,
            course_id,
        })
        .await?;
    let status = if result.already_enrolled {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(EnrollmentResponse {
            course_id: result.course_id.to_string(),
            already_enrolled: result.already_enrolled,
        }),
    ))
}

/// GET /api/webinars
pub async fn list_webinars(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let webinars = state.list_webinars_handler().handle().await?;
    let body: Vec<WebinarResponse> = webinars.iter().map(WebinarResponse::from).collect();
    Ok(Json(body))
}

/// GET /api/webinars/:slug
pub async fn get_webinar(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let webinar = state.get_webinar_handler().handle(&slug).await?;
    Ok(Json(WebinarResponse::from(&webinar)))
}

/// POST /api/webinars/:slug/register
pub async fn register(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .register_handler()
        .handle(RegisterForWebinarCommand {
            user_id: user.id,
            slug,
        })
        .await?;
    let status = if result.already_registered {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(RegistrationResponse {
            webinar_id: result.webinar_id.to_string(),
            already_registered: result.already_registered,
        }),
    ))
}
