//! LearningProgress aggregate - one record per (student, course).
//!
//! Holds everything about a student's journey through one course: the
//! completed-lesson set, the last lesson opened, assessment attempts and a
//! cached completion percentage. The cached percentage always equals what
//! the aggregator computes for the course tree at the time of the last write.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, DomainError, LessonId, Percentage, Timestamp, UserId};

use super::{aggregate, AssessmentAttempt, ProgressReport};

/// The lesson a student opened most recently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonAccess {
    pub lesson_id: LessonId,
    pub accessed_at: Timestamp,
}

/// Outcome of marking a lesson complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChange {
    /// The lesson was added to the completed set.
    Recorded,
    /// The lesson was already complete; nothing changed.
    Unchanged,
}

/// Per-(user, course) progress aggregate.
///
/// # Invariants
///
/// - `completed_lessons` holds no duplicates and keeps completion order
/// - `percentage` matches [`aggregate`] for the course at the last write
/// - `completed_at` is set once the course first reaches 100%
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningProgress {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub completed_lessons: Vec<LessonId>,
    pub last_accessed: Option<LessonAccess>,
    pub percentage: Percentage,
    pub attempts: Vec<AssessmentAttempt>,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    /// Optimistic concurrency token, bumped by the repository on each save.
    #[serde(default)]
    pub version: i64,
}

impl LearningProgress {
    /// Creates an empty progress record at enrollment.
    pub fn start(user_id: UserId, course_id: CourseId) -> Self {
        let now = Timestamp::now();
        Self {
            user_id,
            course_id,
            completed_lessons: Vec::new(),
            last_accessed: None,
            percentage: Percentage::ZERO,
            attempts: Vec::new(),
            started_at: now,
            updated_at: now,
            completed_at: None,
            version: 0,
        }
    }

    /// Marks a lesson complete. Idempotent.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` if the lesson is not part of `course`.
    pub fn complete_lesson(
        &mut self,
        course: &Course,
        lesson_id: LessonId,
    ) -> Result<CompletionChange, DomainError> {
        self.ensure_course(course)?;
        course.require_lesson(&lesson_id)?;

        let change = if self.completed_lessons.contains(&lesson_id) {
            CompletionChange::Unchanged
        } else {
            self.completed_lessons.push(lesson_id);
            CompletionChange::Recorded
        };
        self.last_accessed = Some(LessonAccess {
            lesson_id,
            accessed_at: Timestamp::now(),
        });
        self.refresh(course);
        Ok(change)
    }

    /// Records that the student opened a lesson.
    pub fn record_access(&mut self, course: &Course, lesson_id: LessonId) -> Result<(), DomainError> {
        self.ensure_course(course)?;
        course.require_lesson(&lesson_id)?;
        self.last_accessed = Some(LessonAccess {
            lesson_id,
            accessed_at: Timestamp::now(),
        });
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn record_attempt(&mut self, attempt: AssessmentAttempt) {
        self.attempts.push(attempt);
        self.updated_at = Timestamp::now();
    }

    /// Report against the current course tree.
    pub fn report(&self, course: &Course) -> ProgressReport {
        aggregate(course, &self.completed_lessons)
    }

    /// Recomputes the cached percentage against the current course tree.
    pub fn refresh(&mut self, course: &Course) {
        let report = self.report(course);
        self.percentage = report.percentage;
        if report.is_complete() && self.completed_at.is_none() {
            self.completed_at = Some(Timestamp::now());
        }
        self.updated_at = Timestamp::now();
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn passed_attempts(&self) -> usize {
        self.attempts.iter().filter(|a| a.passed).count()
    }

    fn ensure_course(&self, course: &Course) -> Result<(), DomainError> {
        if course.id != self.course_id {
            return Err(DomainError::validation(
                "course_id",
                "Progress record belongs to a different course",
            ));
        }
        Ok(())
    }
}
