//! Instructor course authoring.
//!
//! Every edit loads the course, checks the caller may manage it, applies one
//! domain operation and writes the course back.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::{Course, CourseDetailsUpdate, CourseLevel, LessonContent};
use crate::domain::foundation::{
    AuthenticatedUser, CourseId, DomainError, ErrorCode, LessonId, ModuleId, Money, OwnedByUser,
    Slug,
};
use crate::ports::{CourseFilter, CourseRepository};

/// Command to create a draft course.
#[derive(Debug, Clone)]
pub struct CreateCourseCommand {
    pub caller: AuthenticatedUser,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub title: String,
    pub summary: String,
    pub level: CourseLevel,
    pub price: Money,
}

pub struct CreateCourseHandler {
    courses: Arc<dyn CourseRepository>,
}

impl CreateCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, cmd: CreateCourseCommand) -> Result<Course, DomainError> {
        let slug = match &cmd.slug {
            Some(slug) => Slug::new(slug.as_str())?,
            None => Slug::from_title(&cmd.title)?,
        };
        let course = Course::create(
            slug,
            cmd.title,
            cmd.summary,
            cmd.level,
            cmd.price,
            cmd.caller.id.clone(),
        )?;
        self.courses.save(&course).await?;

        info!(course_id = %course.id, slug = %course.slug.as_str(), "course created");
        Ok(course)
    }
}

/// A single authoring operation on a course.
#[derive(Debug, Clone)]
pub enum CourseEdit {
    UpdateDetails(CourseDetailsUpdate),
    AddModule { title: String },
    RenameModule { module_id: ModuleId, title: String },
    RemoveModule { module_id: ModuleId },
    AddLesson { module_id: ModuleId, content: LessonContent },
    UpdateLesson { lesson_id: LessonId, content: LessonContent },
    RemoveLesson { lesson_id: LessonId },
    ReorderLessons { module_id: ModuleId, lesson_ids: Vec<LessonId> },
    Publish,
    Archive,
    Unpublish,
}

#[derive(Debug, Clone)]
pub struct EditCourseCommand {
    pub caller: AuthenticatedUser,
    pub course_id: CourseId,
    pub edit: CourseEdit,
}

/// Id of a module or lesson created by the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedPart {
    Module(ModuleId),
    Lesson(LessonId),
}

#[derive(Debug, Clone)]
pub struct EditCourseResult {
    pub course: Course,
    pub created: Option<CreatedPart>,
}

pub struct EditCourseHandler {
    courses: Arc<dyn CourseRepository>,
}

impl EditCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, cmd: EditCourseCommand) -> Result<EditCourseResult, DomainError> {
        let mut course = load_managed(self.courses.as_ref(), &cmd.course_id, &cmd.caller).await?;

        let mut created = None;
        match cmd.edit {
            CourseEdit::UpdateDetails(update) => course.update_details(update)?,
            CourseEdit::AddModule { title } => {
                created = Some(CreatedPart::Module(course.add_module(title)?));
            }
            CourseEdit::RenameModule { module_id, title } => {
                course.rename_module(&module_id, title)?
            }
            CourseEdit::RemoveModule { module_id } => course.remove_module(&module_id)?,
            CourseEdit::AddLesson { module_id, content } => {
                created = Some(CreatedPart::Lesson(course.add_lesson(&module_id, content)?));
            }
            CourseEdit::UpdateLesson { lesson_id, content } => {
                course.update_lesson(&lesson_id, content)?
            }
            CourseEdit::RemoveLesson { lesson_id } => course.remove_lesson(&lesson_id)?,
            CourseEdit::ReorderLessons {
                module_id,
                lesson_ids,
            } => course.reorder_lessons(&module_id, &lesson_ids)?,
            CourseEdit::Publish => {
                course.publish()?;
                info!(course_id = %course.id, "course published");
            }
            CourseEdit::Archive => {
                course.archive()?;
                info!(course_id = %course.id, "course archived");
            }
            CourseEdit::Unpublish => course.unpublish()?,
        }

        self.courses.update(&course).await?;
        Ok(EditCourseResult { course, created })
    }
}

#[derive(Debug, Clone)]
pub struct DeleteCourseCommand {
    pub caller: AuthenticatedUser,
    pub course_id: CourseId,
}

pub struct DeleteCourseHandler {
    courses: Arc<dyn CourseRepository>,
}

impl DeleteCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, cmd: DeleteCourseCommand) -> Result<(), DomainError> {
        let course = load_managed(self.courses.as_ref(), &cmd.course_id, &cmd.caller).await?;
        course.check_deletable()?;
        self.courses.delete(&course.id).await?;

        info!(course_id = %course.id, "course deleted");
        Ok(())
    }
}

/// Courses authored by the caller, in every status.
pub struct ListOwnCoursesHandler {
    courses: Arc<dyn CourseRepository>,
}

impl ListOwnCoursesHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, caller: &AuthenticatedUser) -> Result<Vec<Course>, DomainError> {
        self.courses
            .list(&CourseFilter::by_instructor(caller.id.clone()))
            .await
    }
}

async fn load_managed(
    courses: &dyn CourseRepository,
    course_id: &CourseId,
    caller: &AuthenticatedUser,
) -> Result<Course, DomainError> {
    let course = courses
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::CourseNotFound, "Course", course_id))?;
    course.check_can_manage(caller)?;
    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::catalog::CourseStatus;
    use crate::domain::foundation::{Role, UserId};

    fn instructor(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new(id).unwrap(),
            format!("{}@example.com", id),
            None,
            Role::Instructor,
        )
    }

    async fn created(store: &Arc<InMemoryStore>, owner: &AuthenticatedUser) -> Course {
        CreateCourseHandler::new(store.clone())
            .handle(CreateCourseCommand {
                caller: owner.clone(),
                slug: None,
                title: "Options Basics".to_string(),
                summary: "Calls and puts".to_string(),
                level: CourseLevel::Beginner,
                price: Money::free("INR").unwrap(),
            })
            .await
            .unwrap()
    }

    async fn edit(
        store: &Arc<InMemoryStore>,
        caller: &AuthenticatedUser,
        course_id: CourseId,
        edit: CourseEdit,
    ) -> Result<EditCourseResult, DomainError> {
        EditCourseHandler::new(store.clone())
            .handle(EditCourseCommand {
                caller: caller.clone(),
                course_id,
                edit,
            })
            .await
    }

    #[tokio::test]
    async fn create_derives_slug_and_rejects_duplicates() {
        let store = Arc::new(InMemoryStore::new());
        let owner = instructor("inst-1");
        let course = created(&store, &owner).await;
        assert_eq!(course.slug.as_str(), "options-basics");

        let err = CreateCourseHandler::new(store.clone())
            .handle(CreateCourseCommand {
                caller: owner,
                slug: Some("options-basics".to_string()),
                title: "Another".to_string(),
                summary: String::new(),
                level: CourseLevel::Advanced,
                price: Money::free("INR").unwrap(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[tokio::test]
    async fn author_builds_and_publishes() {
        let store = Arc::new(InMemoryStore::new());
        let owner = instructor("inst-1");
        let course = created(&store, &owner).await;

        let result = edit(&store, &owner, course.id, CourseEdit::AddModule {
            title: "Intro".to_string(),
        })
        .await
        .unwrap();
        let Some(CreatedPart::Module(module_id)) = result.created else {
            panic!("expected a module id");
        };

        edit(&store, &owner, course.id, CourseEdit::AddLesson {
            module_id,
            content: LessonContent {
                title: "What is an option".to_string(),
                duration_minutes: 12,
                ..Default::default()
            },
        })
        .await
        .unwrap();

        let published = edit(&store, &owner, course.id, CourseEdit::Publish)
            .await
            .unwrap();
        assert_eq!(published.course.status, CourseStatus::Published);
    }

    #[tokio::test]
    async fn publishing_empty_course_fails_validation() {
        let store = Arc::new(InMemoryStore::new());
        let owner = instructor("inst-1");
        let course = created(&store, &owner).await;

        let err = edit(&store, &owner, course.id, CourseEdit::Publish)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn other_instructor_is_forbidden_but_admin_is_not() {
        let store = Arc::new(InMemoryStore::new());
        let owner = instructor("inst-1");
        let course = created(&store, &owner).await;

        let err = edit(&store, &instructor("inst-2"), course.id, CourseEdit::AddModule {
            title: "Hijack".to_string(),
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let admin = AuthenticatedUser::new(
            UserId::new("root").unwrap(),
            "root@example.com",
            None,
            Role::Admin,
        );
        edit(&store, &admin, course.id, CourseEdit::AddModule {
            title: "Admin module".to_string(),
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn delete_removes_unenrolled_course() {
        let store = Arc::new(InMemoryStore::new());
        let owner = instructor("inst-1");
        let course = created(&store, &owner).await;

        DeleteCourseHandler::new(store.clone())
            .handle(DeleteCourseCommand {
                caller: owner,
                course_id: course.id,
            })
            .await
            .unwrap();
        assert!(CourseRepository::find_by_id(store.as_ref(), &course.id)
            .await
            .unwrap()
            .is_none());
    }
}
