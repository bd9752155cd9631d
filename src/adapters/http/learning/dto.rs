//! HTTP DTOs for learning endpoints.
//!
//! Progress views and the dashboard serialize directly; only requests and
//! notifications get their own shapes here.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::LessonId;
use crate::domain::learning::{AssessmentAttempt, AssessmentKind};
use crate::domain::notification::{Notification, NotificationKind};

use crate::adapters::http::catalog::dto::rfc3339;

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteLessonRequest {
    pub lesson_id: LessonId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    pub kind: AssessmentKind,
    /// Quiz, simulation or module identifier chosen by the client.
    pub reference: String,
    pub score: u32,
    pub max_score: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    pub id: String,
    pub kind: AssessmentKind,
    pub reference: String,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u8,
    pub passed: bool,
    pub attempted_at: String,
}

impl From<&AssessmentAttempt> for AssessmentResponse {
    fn from(attempt: &AssessmentAttempt) -> Self {
        Self {
            id: attempt.id.to_string(),
            kind: attempt.kind,
            reference: attempt.reference.clone(),
            score: attempt.score,
            max_score: attempt.max_score,
            percentage: attempt.percentage().value(),
            passed: attempt.passed,
            attempted_at: rfc3339(&attempt.attempted_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: String,
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind,
            title: n.title.clone(),
            body: n.body.clone(),
            read: n.read,
            created_at: rfc3339(&n.created_at),
        }
    }
}
