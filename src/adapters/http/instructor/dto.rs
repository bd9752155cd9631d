//! Request DTOs for instructor authoring.
//!
//! Course and webinar responses reuse the catalog DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::http::catalog::dto::CourseResponse;
use crate::domain::catalog::{CourseDetailsUpdate, CourseLevel, LessonContent, LessonResource};
use crate::domain::catalog::WebinarSchedule;
use crate::domain::foundation::{LessonId, Money, Timestamp, ValidationError};

/// Price as submitted by an instructor. Currency falls back to the
/// platform default.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRequest {
    pub amount: u64,
    #[serde(default)]
    pub currency: Option<String>,
}

impl PriceRequest {
    pub fn into_money(self, default_currency: &str) -> Result<Money, ValidationError> {
        let currency = self.currency.unwrap_or_else(|| default_currency.to_string());
        Money::new(self.amount, currency)
    }
}

fn price_or_free(price: Option<PriceRequest>, default_currency: &str) -> Result<Money, ValidationError> {
    match price {
        Some(price) => price.into_money(default_currency),
        None => Money::free(default_currency),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub level: CourseLevel,
    /// Omitted means free.
    #[serde(default)]
    pub price: Option<PriceRequest>,
}

impl CreateCourseRequest {
    pub fn price(&mut self, default_currency: &str) -> Result<Money, ValidationError> {
        price_or_free(self.price.take(), default_currency)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub level: Option<CourseLevel>,
    pub price: Option<PriceRequest>,
}

impl UpdateCourseRequest {
    pub fn into_update(self, default_currency: &str) -> Result<CourseDetailsUpdate, ValidationError> {
        Ok(CourseDetailsUpdate {
            title: self.title,
            summary: self.summary,
            level: self.level,
            price: self
                .price
                .map(|p| p.into_money(default_currency))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleRequest {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonRequest {
    pub title: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub resources: Vec<LessonResource>,
    #[serde(default)]
    pub duration_minutes: u32,
}

impl From<LessonRequest> for LessonContent {
    fn from(req: LessonRequest) -> Self {
        Self {
            title: req.title,
            video_url: req.video_url,
            body: req.body,
            resources: req.resources,
            duration_minutes: req.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderLessonsRequest {
    pub lesson_ids: Vec<LessonId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebinarRequest {
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub price: Option<PriceRequest>,
}

impl WebinarRequest {
    pub fn into_schedule(self, default_currency: &str) -> Result<(Option<String>, WebinarSchedule), ValidationError> {
        let price = price_or_free(self.price, default_currency)?;
        Ok((
            self.slug,
            WebinarSchedule {
                title: self.title,
                description: self.description,
                starts_at: Timestamp::from_datetime(self.starts_at),
                duration_minutes: self.duration_minutes,
                capacity: self.capacity,
                price,
            },
        ))
    }
}

/// Course after an edit, plus the id of a module or lesson it created.
#[derive(Debug, Clone, Serialize)]
pub struct EditCourseResponse {
    pub course: CourseResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<String>,
}
