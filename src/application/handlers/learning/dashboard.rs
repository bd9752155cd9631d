//! Student dashboard and notification inbox.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::catalog::WebinarStatus;
use crate::domain::commerce::Product;
use crate::domain::foundation::{
    CourseId, DomainError, NotificationId, Percentage, Timestamp, UserId, WebinarId,
};
use crate::domain::learning::aggregate;
use crate::domain::notification::Notification;
use crate::ports::{
    CourseRepository, EntitlementLedger, NotificationRepository, ProgressRepository,
    WebinarRepository,
};

#[derive(Debug, Clone, Serialize)]
pub struct EnrolledCourseSummary {
    pub course_id: CourseId,
    pub slug: String,
    pub title: String,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub percentage: Percentage,
    pub completed: bool,
    pub last_accessed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredWebinar {
    pub webinar_id: WebinarId,
    pub slug: String,
    pub title: String,
    pub starts_at: Timestamp,
    pub status: WebinarStatus,
    pub paid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub courses: Vec<EnrolledCourseSummary>,
    pub completed_courses: usize,
    pub webinars: Vec<RegisteredWebinar>,
    pub unread_notifications: u64,
}

/// Builds the dashboard from the ledger, never from stored id arrays.
pub struct StudentDashboardHandler {
    ledger: Arc<dyn EntitlementLedger>,
    courses: Arc<dyn CourseRepository>,
    webinars: Arc<dyn WebinarRepository>,
    progress: Arc<dyn ProgressRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl StudentDashboardHandler {
    pub fn new(
        ledger: Arc<dyn EntitlementLedger>,
        courses: Arc<dyn CourseRepository>,
        webinars: Arc<dyn WebinarRepository>,
        progress: Arc<dyn ProgressRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            ledger,
            courses,
            webinars,
            progress,
            notifications,
        }
    }

    pub async fn handle(&self, user_id: &UserId) -> Result<StudentDashboard, DomainError> {
        let entitlements = self.ledger.list_for_user(user_id).await?;
        let records = self.progress.list_for_user(user_id).await?;

        let mut courses = Vec::new();
        let mut webinars = Vec::new();
        for entitlement in &entitlements {
            match entitlement.product {
                Product::Course(course_id) => {
                    let Some(course) = self.courses.find_by_id(&course_id).await? else {
                        continue;
                    };
                    let record = records.iter().find(|p| p.course_id == course_id);
                    let completed = record
                        .map(|p| p.completed_lessons.as_slice())
                        .unwrap_or_default();
                    let report = aggregate(&course, completed);
                    courses.push(EnrolledCourseSummary {
                        course_id,
                        slug: course.slug.as_str().to_string(),
                        title: course.title.clone(),
                        total_lessons: report.total_lessons,
                        completed_lessons: report.completed_count,
                        percentage: report.percentage,
                        completed: record.is_some_and(|p| p.is_completed()),
                        last_accessed_at: record
                            .and_then(|p| p.last_accessed.as_ref())
                            .map(|a| a.accessed_at),
                    });
                }
                Product::Webinar(webinar_id) => {
                    let Some(webinar) = self.webinars.find_by_id(&webinar_id).await? else {
                        continue;
                    };
                    webinars.push(RegisteredWebinar {
                        webinar_id,
                        slug: webinar.slug.as_str().to_string(),
                        title: webinar.title,
                        starts_at: webinar.starts_at,
                        status: webinar.status,
                        paid: entitlement.source.is_paid(),
                    });
                }
            }
        }
        webinars.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));

        let completed_courses = courses.iter().filter(|c| c.completed).count();
        let unread_notifications = self.notifications.count_unread(user_id).await?;

        Ok(StudentDashboard {
            courses,
            completed_courses,
            webinars,
            unread_notifications,
        })
    }
}

pub struct ListNotificationsHandler {
    notifications: Arc<dyn NotificationRepository>,
}

impl ListNotificationsHandler {
    pub const DEFAULT_LIMIT: u32 = 50;

    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn handle(
        &self,
        user_id: &UserId,
        limit: Option<u32>,
    ) -> Result<Vec<Notification>, DomainError> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, 200);
        self.notifications.list_for_user(user_id, limit).await
    }
}

pub struct MarkNotificationReadHandler {
    notifications: Arc<dyn NotificationRepository>,
}

impl MarkNotificationReadHandler {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn handle(&self, user_id: &UserId, id: &NotificationId) -> Result<(), DomainError> {
        self.notifications.mark_read(user_id, id).await
    }
}
