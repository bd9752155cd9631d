//! HTTP adapter for student learning.
//!
//! Course progress (any authenticated caller; enrollment checked per course):
//! - `GET /api/courses/:id/progress`
//! - `POST /api/courses/:id/progress` - mark a lesson complete
//! - `POST /api/courses/:id/lessons/:lesson_id/access`
//! - `POST /api/courses/:id/assessments`
//!
//! Student area (`/api/student`, student role or higher):
//! - `GET /dashboard`
//! - `GET /notifications`
//! - `POST /notifications/:id/read`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{progress_routes, student_routes};
