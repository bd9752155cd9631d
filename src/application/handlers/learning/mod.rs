//! Learning handlers.
//!
//! ## Commands
//! - Completing lessons (the single progress write path)
//! - Recording lesson access and assessment attempts
//! - Marking notifications read
//!
//! ## Queries
//! - Course progress report
//! - Student dashboard and notification inbox

mod dashboard;
mod progress;

pub use dashboard::{
    EnrolledCourseSummary, ListNotificationsHandler, MarkNotificationReadHandler,
    RegisteredWebinar, StudentDashboard, StudentDashboardHandler,
};
pub use progress::{
    CompleteLessonCommand, CompleteLessonHandler, CompleteLessonResult, GetProgressHandler,
    GetProgressQuery, ProgressView, RecordAssessmentCommand, RecordAssessmentHandler,
    RecordLessonAccessCommand, RecordLessonAccessHandler,
};
