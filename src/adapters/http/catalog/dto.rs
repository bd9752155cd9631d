//! HTTP DTOs for catalog endpoints.
//!
//! Shared with the instructor area, which returns the same course and
//! webinar shapes.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{
    Course, CourseLevel, CourseModule, CourseStatus, Lesson, LessonResource, Webinar,
    WebinarStatus,
};
use crate::domain::foundation::{Money, Timestamp};

pub(crate) fn rfc3339(ts: &Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCoursesParams {
    #[serde(default)]
    pub level: Option<CourseLevel>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Price in minor units.
#[derive(Debug, Clone, Serialize)]
pub struct PriceResponse {
    pub amount: u64,
    pub currency: String,
    pub is_free: bool,
}

impl From<&Money> for PriceResponse {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.amount(),
            currency: money.currency().to_string(),
            is_free: money.is_free(),
        }
    }
}

/// Course card for listings.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummaryResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub level: CourseLevel,
    pub price: PriceResponse,
    pub instructor_id: String,
    pub status: CourseStatus,
    pub module_count: usize,
    pub lesson_count: usize,
    pub enrolled_count: u64,
    pub published_at: Option<String>,
}

impl From<&Course> for CourseSummaryResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            slug: course.slug.as_str().to_string(),
            title: course.title.clone(),
            summary: course.summary.clone(),
            level: course.level,
            price: PriceResponse::from(&course.price),
            instructor_id: course.instructor_id.to_string(),
            status: course.status,
            module_count: course.modules.len(),
            lesson_count: course.lesson_count(),
            enrolled_count: course.enrolled_count,
            published_at: course.published_at.as_ref().map(rfc3339),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<LessonResource>,
    pub duration_minutes: u32,
}

impl LessonResponse {
    /// Title and duration only.
    fn outline(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.to_string(),
            title: lesson.content.title.clone(),
            video_url: None,
            body: None,
            resources: Vec::new(),
            duration_minutes: lesson.content.duration_minutes,
        }
    }
}

impl From<&Lesson> for LessonResponse {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.to_string(),
            title: lesson.content.title.clone(),
            video_url: lesson.content.video_url.clone(),
            body: lesson.content.body.clone(),
            resources: lesson.content.resources.clone(),
            duration_minutes: lesson.content.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleResponse {
    pub id: String,
    pub title: String,
    pub lessons: Vec<LessonResponse>,
}

impl ModuleResponse {
    fn build(module: &CourseModule, lesson: fn(&Lesson) -> LessonResponse) -> Self {
        Self {
            id: module.id.to_string(),
            title: module.title.clone(),
            lessons: module.lessons.iter().map(lesson).collect(),
        }
    }
}

/// Full course page including the module/lesson tree.
#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    #[serde(flatten)]
    pub summary: CourseSummaryResponse,
    pub modules: Vec<ModuleResponse>,
    /// True when lesson content was withheld from this caller.
    pub content_locked: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CourseResponse {
    fn build(course: &Course, lesson: fn(&Lesson) -> LessonResponse, content_locked: bool) -> Self {
        Self {
            summary: CourseSummaryResponse::from(course),
            modules: course
                .modules
                .iter()
                .map(|m| ModuleResponse::build(m, lesson))
                .collect(),
            content_locked,
            created_at: rfc3339(&course.created_at),
            updated_at: rfc3339(&course.updated_at),
        }
    }

    /// The module/lesson tree without lesson content.
    pub fn outline(course: &Course) -> Self {
        Self::build(course, LessonResponse::outline, true)
    }
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self::build(course, |lesson| LessonResponse::from(lesson), false)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebinarResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub host_id: String,
    pub starts_at: String,
    pub duration_minutes: u32,
    pub capacity: Option<u32>,
    pub seats_left: Option<u64>,
    pub price: PriceResponse,
    pub status: WebinarStatus,
    pub registered_count: u64,
}

impl From<&Webinar> for WebinarResponse {
    fn from(webinar: &Webinar) -> Self {
        Self {
            id: webinar.id.to_string(),
            slug: webinar.slug.as_str().to_string(),
            title: webinar.title.clone(),
            description: webinar.description.clone(),
            host_id: webinar.host_id.to_string(),
            starts_at: rfc3339(&webinar.starts_at),
            duration_minutes: webinar.duration_minutes,
            capacity: webinar.capacity,
            seats_left: webinar.seats_left(),
            price: PriceResponse::from(&webinar.price),
            status: webinar.status,
            registered_count: webinar.registered_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentResponse {
    pub course_id: String,
    pub already_enrolled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationResponse {
    pub webinar_id: String,
    pub already_registered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::test_support::course_with_modules;

    #[test]
    fn course_response_counts_lessons_and_flattens_summary() {
        let course = course_with_modules(&[2, 3]);
        let json = serde_json::to_value(CourseResponse::from(&course)).unwrap();

        assert_eq!(json["lesson_count"], 5);
        assert_eq!(json["module_count"], 2);
        assert_eq!(json["modules"][1]["lessons"].as_array().unwrap().len(), 3);
        assert_eq!(json["price"]["is_free"], true);
    }

    #[test]
    fn outline_keeps_titles_and_durations_only() {
        let mut course = course_with_modules(&[1]);
        let lesson = &mut course.modules[0].lessons[0];
        lesson.content.video_url = Some("https://cdn.example.com/l1.mp4".to_string());
        lesson.content.body = Some("Candlestick anatomy".to_string());

        let json = serde_json::to_value(CourseResponse::outline(&course)).unwrap();
        let lesson = &json["modules"][0]["lessons"][0];

        assert_eq!(json["content_locked"], true);
        assert!(lesson["title"].is_string());
        assert!(lesson["duration_minutes"].is_number());
        assert!(lesson.get("video_url").is_none());
        assert!(lesson.get("body").is_none());
        assert!(lesson.get("resources").is_none());
    }

    #[test]
    fn list_params_accept_missing_level() {
        let params: ListCoursesParams = serde_json::from_str("{}").unwrap();
        assert!(params.level.is_none());
    }
}
