//! Catalog domain - courses and webinars offered on the platform.

mod course;
mod status;
mod webinar;

pub use course::{
    Course, CourseDetailsUpdate, CourseLevel, CourseModule, Lesson, LessonContent, LessonResource,
};
pub use status::{CourseStatus, WebinarStatus};
pub use webinar::{Webinar, WebinarSchedule};

#[cfg(test)]
pub(crate) use course::test_support;
