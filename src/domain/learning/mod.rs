//! Learning domain - student progress through courses.

mod aggregator;
mod assessment;
mod progress;

pub use aggregator::{aggregate, ModuleProgress, NextLesson, ProgressReport};
pub use assessment::{AssessmentAttempt, AssessmentKind, PASS_THRESHOLD};
pub use progress::{CompletionChange, LearningProgress, LessonAccess};
