//! HTTP handlers for instructor course and webinar authoring.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::catalog::dto::{CourseResponse, CourseSummaryResponse, WebinarResponse};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::catalog::{
    CourseEdit, CreateCourseCommand, CreateWebinarCommand, CreatedPart, DeleteCourseCommand,
    EditCourseCommand, EditWebinarCommand, WebinarEdit,
};
use crate::domain::foundation::{AuthenticatedUser, CourseId, LessonId, ModuleId, WebinarId};

use super::dto::{
    CreateCourseRequest, EditCourseResponse, LessonRequest, ModuleRequest,
    ReorderLessonsRequest, UpdateCourseRequest, WebinarRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Courses
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/instructor/courses - courses owned by the caller (all for admins)
pub async fn list_own_courses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let courses = state.own_courses_handler().handle(&user).await?;
    let body: Vec<CourseSummaryResponse> =
        courses.iter().map(CourseSummaryResponse::from).collect();
    Ok(Json(body))
}

/// POST /api/instructor/courses
pub async fn create_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(mut request): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let price = request.price(&state.default_currency)?;
    let course = state
        .create_course_handler()
        .handle(CreateCourseCommand {
            caller: user,
            slug: request.slug,
            title: request.title,
            summary: request.summary,
            level: request.level,
            price,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CourseResponse::from(&course))))
}

async fn apply_edit(
    state: &AppState,
    caller: AuthenticatedUser,
    course_id: CourseId,
    edit: CourseEdit,
) -> Result<Json<EditCourseResponse>, ApiError> {
    let result = state
        .edit_course_handler()
        .handle(EditCourseCommand {
            caller,
            course_id,
            edit,
        })
        .await?;
    let created_id = result.created.map(|part| match part {
        CreatedPart::Module(id) => id.to_string(),
        CreatedPart::Lesson(id) => id.to_string(),
    });
    Ok(Json(EditCourseResponse {
        course: CourseResponse::from(&result.course),
        created_id,
    }))
}

/// PATCH /api/instructor/courses/:id
pub async fn update_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
    Json(request): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let update = request.into_update(&state.default_currency)?;
    apply_edit(&state, user, course_id, CourseEdit::UpdateDetails(update)).await
}

/// DELETE /api/instructor/courses/:id
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_course_handler()
        .handle(DeleteCourseCommand {
            caller: user,
            course_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/instructor/courses/:id/publish
pub async fn publish_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, ApiError> {
    apply_edit(&state, user, course_id, CourseEdit::Publish).await
}

/// POST /api/instructor/courses/:id/unpublish
pub async fn unpublish_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, ApiError> {
    apply_edit(&state, user, course_id, CourseEdit::Unpublish).await
}

/// POST /api/instructor/courses/:id/archive
pub async fn archive_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, ApiError> {
    apply_edit(&state, user, course_id, CourseEdit::Archive).await
}

// ════════════════════════════════════════════════════════════════════════════════
// Modules and lessons
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/instructor/courses/:id/modules
pub async fn add_module(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<CourseId>,
    Json(request): Json<ModuleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = apply_edit(
        &state,
        user,
        course_id,
        CourseEdit::AddModule {
            title: request.title,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, response))
}

/// PATCH /api/instructor/courses/:id/modules/:module_id
pub async fn rename_module(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, module_id)): Path<(CourseId, ModuleId)>,
    Json(request): Json<ModuleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    apply_edit(
        &state,
        user,
        course_id,
        CourseEdit::RenameModule {
            module_id,
            title: request.title,
        },
    )
    .await
}

/// DELETE /api/instructor/courses/:id/modules/:module_id
pub async fn remove_module(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, module_id)): Path<(CourseId, ModuleId)>,
) -> Result<impl IntoResponse, ApiError> {
    apply_edit(&state, user, course_id, CourseEdit::RemoveModule { module_id }).await
}

/// POST /api/instructor/courses/:id/modules/:module_id/lessons
pub async fn add_lesson(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, module_id)): Path<(CourseId, ModuleId)>,
    Json(request): Json<LessonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = apply_edit(
        &state,
        user,
        course_id,
        CourseEdit::AddLesson {
            module_id,
            content: request.into(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, response))
}

/// PUT /api/instructor/courses/:id/modules/:module_id/order
pub async fn reorder_lessons(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, module_id)): Path<(CourseId, ModuleId)>,
    Json(request): Json<ReorderLessonsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    apply_edit(
        &state,
        user,
        course_id,
        CourseEdit::ReorderLessons {
            module_id,
            lesson_ids: request.lesson_ids,
        },
    )
    .await
}

/// PUT /api/instructor/courses/:id/lessons/:lesson_id
pub async fn update_lesson(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, lesson_id)): Path<(CourseId, LessonId)>,
    Json(request): Json<LessonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    apply_edit(
        &state,
        user,
        course_id,
        CourseEdit::UpdateLesson {
            lesson_id,
            content: request.into(),
        },
    )
    .await
}

/// DELETE /api/instructor/courses/:id/lessons/:lesson_id
pub async fn remove_lesson(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, lesson_id)): Path<(CourseId, LessonId)>,
) -> Result<impl IntoResponse, ApiError> {
    apply_edit(&state, user, course_id, CourseEdit::RemoveLesson { lesson_id }).await
}

// ════════════════════════════════════════════════════════════════════════════════
// Webinars
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/instructor/webinars
pub async fn list_own_webinars(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let webinars = state.own_webinars_handler().handle(&user).await?;
    let body: Vec<WebinarResponse> = webinars.iter().map(WebinarResponse::from).collect();
    Ok(Json(body))
}

/// POST /api/instructor/webinars
pub async fn create_webinar(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<WebinarRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (slug, schedule) = request.into_schedule(&state.default_currency)?;
    let webinar = state
        .create_webinar_handler()
        .handle(CreateWebinarCommand {
            caller: user,
            slug,
            schedule,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(WebinarResponse::from(&webinar))))
}

async fn apply_webinar_edit(
    state: &AppState,
    caller: AuthenticatedUser,
    webinar_id: WebinarId,
    edit: WebinarEdit,
) -> Result<Json<WebinarResponse>, ApiError> {
    let webinar = state
        .edit_webinar_handler()
        .handle(EditWebinarCommand {
            caller,
            webinar_id,
            edit,
        })
        .await?;
    Ok(Json(WebinarResponse::from(&webinar)))
}

/// PUT /api/instructor/webinars/:id
pub async fn reschedule_webinar(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(webinar_id): Path<WebinarId>,
    Json(request): Json<WebinarRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (_, schedule) = request.into_schedule(&state.default_currency)?;
    apply_webinar_edit(&state, user, webinar_id, WebinarEdit::Reschedule(schedule)).await
}

/// POST /api/instructor/webinars/:id/live
pub async fn start_webinar(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(webinar_id): Path<WebinarId>,
) -> Result<impl IntoResponse, ApiError> {
    apply_webinar_edit(&state, user, webinar_id, WebinarEdit::GoLive).await
}

/// POST /api/instructor/webinars/:id/complete
pub async fn complete_webinar(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(webinar_id): Path<WebinarId>,
) -> Result<impl IntoResponse, ApiError> {
    apply_webinar_edit(&state, user, webinar_id, WebinarEdit::Complete).await
}

/// POST /api/instructor/webinars/:id/cancel
pub async fn cancel_webinar(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(webinar_id): Path<WebinarId>,
) -> Result<impl IntoResponse, ApiError> {
    apply_webinar_edit(&state, user, webinar_id, WebinarEdit::Cancel).await
}
