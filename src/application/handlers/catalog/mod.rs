//! Catalog handlers.
//!
//! ## Queries
//! - Published course listing and course pages
//! - Upcoming webinars and webinar pages
//!
//! ## Commands (instructor)
//! - Course creation, tree editing, publication and deletion
//! - Webinar scheduling and status changes

mod author_course;
mod author_webinar;
mod browse_catalog;

pub use author_course::{
    CourseEdit, CreateCourseCommand, CreateCourseHandler, CreatedPart, DeleteCourseCommand,
    DeleteCourseHandler, EditCourseCommand, EditCourseHandler, EditCourseResult,
    ListOwnCoursesHandler,
};
pub use author_webinar::{
    CreateWebinarCommand, CreateWebinarHandler, EditWebinarCommand, EditWebinarHandler,
    ListOwnWebinarsHandler, WebinarEdit,
};
pub use browse_catalog::{
    CourseView, GetCourseHandler, GetCourseQuery, GetWebinarHandler, ListCoursesHandler,
    ListCoursesQuery, ListUpcomingWebinarsHandler,
};
