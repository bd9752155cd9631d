//! Course repository port.

use async_trait::async_trait;

use crate::domain::catalog::{Course, CourseLevel, CourseStatus};
use crate::domain::foundation::{CourseId, DomainError, UserId};

/// Filter for catalog listings.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub status: Option<CourseStatus>,
    pub level: Option<CourseLevel>,
    pub instructor_id: Option<UserId>,
}

impl CourseFilter {
    /// Published courses, optionally at one level.
    pub fn published(level: Option<CourseLevel>) -> Self {
        Self {
            status: Some(CourseStatus::Published),
            level,
            instructor_id: None,
        }
    }

    pub fn by_instructor(instructor_id: UserId) -> Self {
        Self {
            instructor_id: Some(instructor_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, course: &Course) -> bool {
        self.status.map_or(true, |s| course.status == s)
            && self.level.map_or(true, |l| course.level == l)
            && self
                .instructor_id
                .as_ref()
                .map_or(true, |i| &course.instructor_id == i)
    }
}

/// Persistence for the Course aggregate.
///
/// `enrolled_count` is owned by the entitlement ledger; `update` must not
/// overwrite it.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the slug is taken
    async fn save(&self, course: &Course) -> Result<(), DomainError>;

    /// Replace course content and metadata.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if the course does not exist
    async fn update(&self, course: &Course) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>, DomainError>;

    /// Courses matching the filter, newest first.
    async fn list(&self, filter: &CourseFilter) -> Result<Vec<Course>, DomainError>;

    /// Delete a course with no enrollments.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if the course does not exist
    /// - `AlreadyExists` if anyone is enrolled
    async fn delete(&self, id: &CourseId) -> Result<(), DomainError>;
}
