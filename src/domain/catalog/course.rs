//! Course aggregate.
//!
//! A course is an ordered tree: modules in order, lessons in order inside
//! each module. Lesson ids are unique within a course. The tree order is
//! the order the progress aggregator walks to find the next lesson.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, LessonId, ModuleId, Money, OwnedByUser, Slug, StateMachine,
    Timestamp, UserId, CourseId,
};

use super::CourseStatus;

/// Difficulty level advertised in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }
}

/// Downloadable or linked material attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonResource {
    pub title: String,
    pub url: String,
}

/// Editable fields of a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LessonContent {
    pub title: String,
    pub video_url: Option<String>,
    pub body: Option<String>,
    pub resources: Vec<LessonResource>,
    pub duration_minutes: u32,
}

impl LessonContent {
    fn validate(&self) -> Result<(), DomainError> {
        require_text("title", &self.title)?;
        if let Some(url) = &self.video_url {
            require_http_url("video_url", url)?;
        }
        for resource in &self.resources {
            require_text("resources.title", &resource.title)?;
            require_http_url("resources.url", &resource.url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    #[serde(flatten)]
    pub content: LessonContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: ModuleId,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

/// Course aggregate.
///
/// # Invariants
///
/// - `slug` is unique across courses (enforced by the repository)
/// - lesson ids are unique within the course
/// - a published course has at least one lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub slug: Slug,
    pub title: String,
    pub summary: String,
    pub level: CourseLevel,
    pub price: Money,
    pub instructor_id: UserId,
    pub status: CourseStatus,
    pub modules: Vec<CourseModule>,
    pub enrolled_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
}

/// Partial update of course metadata.
#[derive(Debug, Clone, Default)]
pub struct CourseDetailsUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub level: Option<CourseLevel>,
    pub price: Option<Money>,
}

impl Course {
    /// Creates a new draft course with no modules.
    pub fn create(
        slug: Slug,
        title: impl Into<String>,
        summary: impl Into<String>,
        level: CourseLevel,
        price: Money,
        instructor_id: UserId,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        require_text("title", &title)?;
        let now = Timestamp::now();
        Ok(Self {
            id: CourseId::new(),
            slug,
            title,
            summary: summary.into(),
            level,
            price,
            instructor_id,
            status: CourseStatus::Draft,
            modules: Vec::new(),
            enrolled_count: 0,
            created_at: now,
            updated_at: now,
            published_at: None,
        })
    }

    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    pub fn is_free(&self) -> bool {
        self.price.is_free()
    }

    /// Total number of lessons across all modules.
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Iterates lessons in tree order, paired with their module.
    pub fn lessons(&self) -> impl Iterator<Item = (&CourseModule, &Lesson)> {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter().map(move |l| (m, l)))
    }

    pub fn contains_lesson(&self, lesson_id: &LessonId) -> bool {
        self.find_lesson(lesson_id).is_some()
    }

    pub fn find_lesson(&self, lesson_id: &LessonId) -> Option<&Lesson> {
        self.lessons().map(|(_, l)| l).find(|l| &l.id == lesson_id)
    }

    /// Returns the lesson or a validation error naming the lesson.
    pub fn require_lesson(&self, lesson_id: &LessonId) -> Result<&Lesson, DomainError> {
        self.find_lesson(lesson_id).ok_or_else(|| {
            DomainError::validation("lesson_id", "Lesson does not belong to this course")
                .with_detail("lesson_id", lesson_id.to_string())
        })
    }

    pub fn update_details(&mut self, update: CourseDetailsUpdate) -> Result<(), DomainError> {
        if let Some(title) = update.title {
            require_text("title", &title)?;
            self.title = title;
        }
        if let Some(summary) = update.summary {
            self.summary = summary;
        }
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        self.touch();
        Ok(())
    }

    /// Appends a module and returns its id.
    pub fn add_module(&mut self, title: impl Into<String>) -> Result<ModuleId, DomainError> {
        let title = title.into();
        require_text("title", &title)?;
        let id = ModuleId::new();
        self.modules.push(CourseModule {
            id,
            title,
            lessons: Vec::new(),
        });
        self.touch();
        Ok(id)
    }

    pub fn rename_module(
        &mut self,
        module_id: &ModuleId,
        title: impl Into<String>,
    ) -> Result<(), DomainError> {
        let title = title.into();
        require_text("title", &title)?;
        self.module_mut(module_id)?.title = title;
        self.touch();
        Ok(())
    }

    /// Removes a module and all of its lessons.
    ///
    /// A published course must keep at least one lesson.
    pub fn remove_module(&mut self, module_id: &ModuleId) -> Result<(), DomainError> {
        let index = self
            .modules
            .iter()
            .position(|m| &m.id == module_id)
            .ok_or_else(|| module_not_found(module_id))?;
        let remaining = self.lesson_count() - self.modules[index].lessons.len();
        self.ensure_keeps_lessons(remaining)?;
        self.modules.remove(index);
        self.touch();
        Ok(())
    }

    /// Appends a lesson to a module and returns its id.
    pub fn add_lesson(
        &mut self,
        module_id: &ModuleId,
        content: LessonContent,
    ) -> Result<LessonId, DomainError> {
        content.validate()?;
        let id = LessonId::new();
        self.module_mut(module_id)?
            .lessons
            .push(Lesson { id, content });
        self.touch();
        Ok(id)
    }

    pub fn update_lesson(
        &mut self,
        lesson_id: &LessonId,
        content: LessonContent,
    ) -> Result<(), DomainError> {
        content.validate()?;
        let lesson = self
            .modules
            .iter_mut()
            .flat_map(|m| m.lessons.iter_mut())
            .find(|l| &l.id == lesson_id)
            .ok_or_else(|| lesson_not_found(lesson_id))?;
        lesson.content = content;
        self.touch();
        Ok(())
    }

    pub fn remove_lesson(&mut self, lesson_id: &LessonId) -> Result<(), DomainError> {
        if !self.contains_lesson(lesson_id) {
            return Err(lesson_not_found(lesson_id));
        }
        self.ensure_keeps_lessons(self.lesson_count() - 1)?;
        for module in &mut self.modules {
            module.lessons.retain(|l| &l.id != lesson_id);
        }
        self.touch();
        Ok(())
    }

    /// Reorders the lessons of one module.
    ///
    /// `order` must be a permutation of the module's current lesson ids.
    pub fn reorder_lessons(
        &mut self,
        module_id: &ModuleId,
        order: &[LessonId],
    ) -> Result<(), DomainError> {
        let module = self.module_mut(module_id)?;
        let mut current: Vec<LessonId> = module.lessons.iter().map(|l| l.id).collect();
        let mut requested = order.to_vec();
        current.sort();
        requested.sort();
        if current != requested {
            return Err(DomainError::validation(
                "lesson_ids",
                "Order must list every lesson of the module exactly once",
            ));
        }
        let mut lessons = std::mem::take(&mut module.lessons);
        for id in order {
            if let Some(pos) = lessons.iter().position(|l| &l.id == id) {
                module.lessons.push(lessons.swap_remove(pos));
            }
        }
        self.touch();
        Ok(())
    }

    /// Publishes the course. Requires at least one lesson.
    pub fn publish(&mut self) -> Result<(), DomainError> {
        if self.lesson_count() == 0 {
            return Err(DomainError::validation(
                "modules",
                "A course needs at least one lesson before it can be published",
            ));
        }
        self.transition(CourseStatus::Published)?;
        if self.published_at.is_none() {
            self.published_at = Some(Timestamp::now());
        }
        Ok(())
    }

    pub fn archive(&mut self) -> Result<(), DomainError> {
        self.transition(CourseStatus::Archived)
    }

    /// Moves an archived or published course back to draft.
    pub fn unpublish(&mut self) -> Result<(), DomainError> {
        self.transition(CourseStatus::Draft)
    }

    /// A course can only be deleted while nobody is enrolled.
    pub fn check_deletable(&self) -> Result<(), DomainError> {
        if self.enrolled_count > 0 {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                "Course has enrollments and cannot be deleted; archive it instead",
            )
            .with_detail("enrolled_count", self.enrolled_count.to_string()));
        }
        Ok(())
    }

    /// Records a new enrollment on the counter.
    pub fn record_enrollment(&mut self) {
        self.enrolled_count += 1;
    }

    fn transition(&mut self, target: CourseStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })?;
        self.touch();
        Ok(())
    }

    fn ensure_keeps_lessons(&self, remaining: usize) -> Result<(), DomainError> {
        if self.is_published() && remaining == 0 {
            return Err(DomainError::validation(
                "modules",
                "A published course must keep at least one lesson",
            ));
        }
        Ok(())
    }

    fn module_mut(&mut self, module_id: &ModuleId) -> Result<&mut CourseModule, DomainError> {
        self.modules
            .iter_mut()
            .find(|m| &m.id == module_id)
            .ok_or_else(|| module_not_found(module_id))
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl OwnedByUser for Course {
    fn owner_id(&self) -> &UserId {
        &self.instructor_id
    }
}

fn module_not_found(module_id: &ModuleId) -> DomainError {
    DomainError::new(ErrorCode::LessonNotFound, "Module not found")
        .with_detail("module_id", module_id.to_string())
}

fn lesson_not_found(lesson_id: &LessonId) -> DomainError {
    DomainError::new(ErrorCode::LessonNotFound, "Lesson not found")
        .with_detail("lesson_id", lesson_id.to_string())
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, format!("{} cannot be empty", field)));
    }
    Ok(())
}

pub(crate) fn require_http_url(field: &str, value: &str) -> Result<(), DomainError> {
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(DomainError::validation(field, "URL must use http or https"));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a free draft course with the given lesson counts per module.
    pub fn course_with_modules(lessons_per_module: &[usize]) -> Course {
        let mut course = Course::create(
            Slug::new("test-course").unwrap(),
            "Test Course",
            "A course for tests",
            CourseLevel::Beginner,
            Money::free("INR").unwrap(),
            UserId::new("instructor-1").unwrap(),
        )
        .unwrap();
        for (m, count) in lessons_per_module.iter().enumerate() {
            let module_id = course.add_module(format!("Module {}", m + 1)).unwrap();
            for l in 0..*count {
                course
                    .add_lesson(
                        &module_id,
                        LessonContent {
                            title: format!("Lesson {}.{}", m + 1, l + 1),
                            duration_minutes: 10,
                            ..Default::default()
                        },
                    )
                    .unwrap();
            }
        }
        course
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::course_with_modules;
    use super::*;

    fn lesson(title: &str) -> LessonContent {
        LessonContent {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn create_starts_as_draft_without_modules() {
        let course = course_with_modules(&[]);
        assert_eq!(course.status, CourseStatus::Draft);
        assert_eq!(course.lesson_count(), 0);
        assert_eq!(course.enrolled_count, 0);
    }

    #[test]
    fn create_rejects_blank_title() {
        let result = Course::create(
            Slug::new("x").unwrap(),
            "  ",
            "",
            CourseLevel::Advanced,
            Money::free("INR").unwrap(),
            UserId::new("i").unwrap(),
        );
        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn publish_requires_a_lesson() {
        let mut course = course_with_modules(&[0]);
        let err = course.publish().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let mut course = course_with_modules(&[1]);
        course.publish().unwrap();
        assert!(course.is_published());
        assert!(course.published_at.is_some());
    }

    #[test]
    fn lessons_iterate_in_tree_order() {
        let course = course_with_modules(&[2, 1]);
        let titles: Vec<_> = course.lessons().map(|(_, l)| l.content.title.clone()).collect();
        assert_eq!(titles, vec!["Lesson 1.1", "Lesson 1.2", "Lesson 2.1"]);
    }

    #[test]
    fn reorder_lessons_applies_permutation() {
        let mut course = course_with_modules(&[3]);
        let module_id = course.modules[0].id;
        let mut ids: Vec<_> = course.modules[0].lessons.iter().map(|l| l.id).collect();
        ids.reverse();

        course.reorder_lessons(&module_id, &ids).unwrap();

        let after: Vec<_> = course.modules[0].lessons.iter().map(|l| l.id).collect();
        assert_eq!(after, ids);
    }

    #[test]
    fn reorder_lessons_rejects_partial_order() {
        let mut course = course_with_modules(&[3]);
        let module_id = course.modules[0].id;
        let ids: Vec<_> = course.modules[0].lessons.iter().take(2).map(|l| l.id).collect();

        let err = course.reorder_lessons(&module_id, &ids).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn published_course_keeps_last_lesson() {
        let mut course = course_with_modules(&[1]);
        course.publish().unwrap();
        let lesson_id = course.modules[0].lessons[0].id;
        assert!(course.remove_lesson(&lesson_id).is_err());
        let module_id = course.modules[0].id;
        assert!(course.remove_module(&module_id).is_err());
    }

    #[test]
    fn add_lesson_rejects_non_http_video() {
        let mut course = course_with_modules(&[0]);
        let module_id = course.modules[0].id;
        let mut content = lesson("Candlesticks");
        content.video_url = Some("ftp://videos/1".to_string());
        assert!(course.add_lesson(&module_id, content).is_err());
    }

    #[test]
    fn update_lesson_unknown_id_is_not_found() {
        let mut course = course_with_modules(&[1]);
        let err = course
            .update_lesson(&LessonId::new(), lesson("Nope"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LessonNotFound);
    }

    #[test]
    fn require_lesson_unknown_id_is_validation_error() {
        let course = course_with_modules(&[1]);
        let err = course.require_lesson(&LessonId::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn check_deletable_blocks_enrolled_course() {
        let mut course = course_with_modules(&[1]);
        assert!(course.check_deletable().is_ok());
        course.record_enrollment();
        assert_eq!(course.check_deletable().unwrap_err().code, ErrorCode::AlreadyExists);
    }

    #[test]
    fn archive_then_unpublish_returns_to_draft() {
        let mut course = course_with_modules(&[1]);
        course.publish().unwrap();
        course.archive().unwrap();
        course.unpublish().unwrap();
        assert_eq!(course.status, CourseStatus::Draft);
    }
}
