//! Progress reads and writes for enrolled students.
//!
//! A student is enrolled in a course exactly when the ledger created a
//! progress record for them. No record means 403, not 404.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::catalog::Course;
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, LessonId, Timestamp, UserId,
};
use crate::domain::learning::{
    AssessmentAttempt, AssessmentKind, CompletionChange, LearningProgress, LessonAccess,
    ProgressReport,
};
use crate::domain::notification::{Notification, NotificationKind};
use crate::ports::{CourseRepository, NotificationRepository, ProgressRepository};

/// Progress report plus the stored learning state.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    #[serde(flatten)]
    pub report: ProgressReport,
    pub last_accessed: Option<LessonAccess>,
    pub attempts: Vec<AssessmentAttempt>,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl ProgressView {
    fn new(course: &Course, progress: &LearningProgress) -> Self {
        Self {
            report: progress.report(course),
            last_accessed: progress.last_accessed.clone(),
            attempts: progress.attempts.clone(),
            started_at: progress.started_at,
            completed_at: progress.completed_at,
        }
    }
}

/// Loads the course and the caller's progress record for it.
async fn load_enrolled(
    courses: &dyn CourseRepository,
    progress: &dyn ProgressRepository,
    user_id: &UserId,
    course_id: &CourseId,
) -> Result<(Course, LearningProgress), DomainError> {
    let course = courses
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::CourseNotFound, "Course", course_id))?;
    let record = progress.find(user_id, course_id).await?.ok_or_else(|| {
        DomainError::forbidden("Not enrolled in this course")
            .with_detail("course_id", course_id.to_string())
    })?;
    Ok((course, record))
}

#[derive(Debug, Clone)]
pub struct GetProgressQuery {
    pub user_id: UserId,
    pub course_id: CourseId,
}

pub struct GetProgressHandler {
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl GetProgressHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { courses, progress }
    }

    pub async fn handle(&self, query: GetProgressQuery) -> Result<ProgressView, DomainError> {
        let (course, record) = load_enrolled(
            self.courses.as_ref(),
            self.progress.as_ref(),
            &query.user_id,
            &query.course_id,
        )
        .await?;
        Ok(ProgressView::new(&course, &record))
    }
}

#[derive(Debug, Clone)]
pub struct CompleteLessonCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub lesson_id: LessonId,
}

#[derive(Debug, Clone)]
pub struct CompleteLessonResult {
    pub view: ProgressView,
    pub change: CompletionChange,
}

/// The single write path for lesson completion.
pub struct CompleteLessonHandler {
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl CompleteLessonHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        progress: Arc<dyn ProgressRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            courses,
            progress,
            notifications,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteLessonCommand,
    ) -> Result<CompleteLessonResult, DomainError> {
        let (course, mut record) = load_enrolled(
            self.courses.as_ref(),
            self.progress.as_ref(),
            &cmd.user_id,
            &cmd.course_id,
        )
        .await?;

        let was_completed = record.is_completed();
        let change = record.complete_lesson(&course, cmd.lesson_id)?;
        record.version = self.progress.update(&record).await?;

        if !was_completed && record.is_completed() {
            info!(user_id = %cmd.user_id, course_id = %course.id, "course completed");
            let notification = Notification::new(
                cmd.user_id.clone(),
                NotificationKind::CourseCompleted,
                "Course completed",
                format!("Congratulations on finishing {}.", course.title),
            );
            self.notifications.save(&notification).await?;
        }

        Ok(CompleteLessonResult {
            view: ProgressView::new(&course, &record),
            change,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecordLessonAccessCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub lesson_id: LessonId,
}

pub struct RecordLessonAccessHandler {
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl RecordLessonAccessHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { courses, progress }
    }

    pub async fn handle(&self, cmd: RecordLessonAccessCommand) -> Result<ProgressView, DomainError> {
        let (course, mut record) = load_enrolled(
            self.courses.as_ref(),
            self.progress.as_ref(),
            &cmd.user_id,
            &cmd.course_id,
        )
        .await?;
        record.record_access(&course, cmd.lesson_id)?;
        record.version = self.progress.update(&record).await?;
        Ok(ProgressView::new(&course, &record))
    }
}

#[derive(Debug, Clone)]
pub struct RecordAssessmentCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub kind: AssessmentKind,
    pub reference: String,
    pub score: u32,
    pub max_score: u32,
}

pub struct RecordAssessmentHandler {
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl RecordAssessmentHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { courses, progress }
    }

    pub async fn handle(
        &self,
        cmd: RecordAssessmentCommand,
    ) -> Result<AssessmentAttempt, DomainError> {
        let (_course, mut record) = load_enrolled(
            self.courses.as_ref(),
            self.progress.as_ref(),
            &cmd.user_id,
            &cmd.course_id,
        )
        .await?;
        let attempt = AssessmentAttempt::grade(cmd.kind, cmd.reference, cmd.score, cmd.max_score)?;
        record.record_attempt(attempt.clone());
        self.progress.update(&record).await?;
        Ok(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::catalog::test_support::course_with_modules;
    use crate::domain::commerce::{Entitlement, EntitlementGrant, EntitlementSource, Product};
    use crate::ports::EntitlementLedger;

    fn student() -> UserId {
        UserId::new("student-1").unwrap()
    }

    async fn enrolled(lessons: &[usize]) -> (Arc<InMemoryStore>, Course) {
        let store = Arc::new(InMemoryStore::new());
        let course = course_with_modules(lessons);
        CourseRepository::save(store.as_ref(), &course).await.unwrap();
        store
            .grant(EntitlementGrant::new(
                Entitlement::new(student(), Product::Course(course.id), EntitlementSource::Free),
                &course.title,
            ))
            .await
            .unwrap();
        (store, course)
    }

    fn complete(store: &Arc<InMemoryStore>) -> CompleteLessonHandler {
        CompleteLessonHandler::new(store.clone(), store.clone(), store.clone())
    }

    #[tokio::test]
    async fn completing_twice_keeps_set_size() {
        let (store, course) = enrolled(&[2, 1]).await;
        let first = course.modules[0].lessons[0].id;
        let handler = complete(&store);
        let cmd = CompleteLessonCommand {
            user_id: student(),
            course_id: course.id,
            lesson_id: first,
        };

        let once = handler.handle(cmd.clone()).await.unwrap();
        let twice = handler.handle(cmd).await.unwrap();

        assert_eq!(once.change, CompletionChange::Recorded);
        assert_eq!(twice.change, CompletionChange::Unchanged);
        assert_eq!(twice.view.report.completed_count, 1);
        assert_eq!(twice.view.report.percentage.value(), 33);
    }

    #[tokio::test]
    async fn unknown_lesson_is_validation_error() {
        let (store, course) = enrolled(&[1]).await;
        let err = complete(&store)
            .handle(CompleteLessonCommand {
                user_id: student(),
                course_id: course.id,
                lesson_id: LessonId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn not_enrolled_is_forbidden() {
        let (store, course) = enrolled(&[1]).await;
        let err = GetProgressHandler::new(store.clone(), store.clone())
            .handle(GetProgressQuery {
                user_id: UserId::new("outsider").unwrap(),
                course_id: course.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn missing_course_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = GetProgressHandler::new(store.clone(), store.clone())
            .handle(GetProgressQuery {
                user_id: student(),
                course_id: CourseId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CourseNotFound);
    }

    #[tokio::test]
    async fn finishing_course_sends_notification() {
        let (store, course) = enrolled(&[1]).await;
        let result = complete(&store)
            .handle(CompleteLessonCommand {
                user_id: student(),
                course_id: course.id,
                lesson_id: course.modules[0].lessons[0].id,
            })
            .await
            .unwrap();

        assert!(result.view.report.is_complete());
        assert!(result.view.completed_at.is_some());
        let notes = NotificationRepository::list_for_user(store.as_ref(), &student(), 10)
            .await
            .unwrap();
        assert_eq!(notes[0].kind, NotificationKind::CourseCompleted);
    }

    #[tokio::test]
    async fn assessment_is_recorded_with_pass_flag() {
        let (store, course) = enrolled(&[1]).await;
        let attempt = RecordAssessmentHandler::new(store.clone(), store.clone())
            .handle(RecordAssessmentCommand {
                user_id: student(),
                course_id: course.id,
                kind: AssessmentKind::Quiz,
                reference: "module-1-quiz".to_string(),
                score: 6,
                max_score: 10,
            })
            .await
            .unwrap();
        assert!(attempt.passed);

        let view = GetProgressHandler::new(store.clone(), store.clone())
            .handle(GetProgressQuery {
                user_id: student(),
                course_id: course.id,
            })
            .await
            .unwrap();
        assert_eq!(view.attempts.len(), 1);
    }
}
