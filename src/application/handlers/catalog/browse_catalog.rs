//! Public catalog queries.
//!
//! Drafts and archived courses are invisible to everyone except their
//! instructor and admins; to anyone else they simply do not exist.
//!
//! Lesson content is unlocked only for the owner, admins and callers holding
//! an entitlement in the ledger. Everyone else sees the outline.

use std::sync::Arc;

use crate::domain::catalog::{Course, CourseLevel, Webinar};
use crate::domain::foundation::{
    AuthenticatedUser, DomainError, ErrorCode, OwnedByUser, Timestamp,
};
use crate::domain::commerce::Product;
use crate::ports::{CourseFilter, CourseRepository, EntitlementLedger, WebinarRepository};

/// Query for the published course listing.
#[derive(Debug, Clone, Default)]
pub struct ListCoursesQuery {
    pub level: Option<CourseLevel>,
}

pub struct ListCoursesHandler {
    courses: Arc<dyn CourseRepository>,
}

impl ListCoursesHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, query: ListCoursesQuery) -> Result<Vec<Course>, DomainError> {
        self.courses.list(&CourseFilter::published(query.level)).await
    }
}

/// Query for a single course page.
#[derive(Debug, Clone)]
pub struct GetCourseQuery {
    pub slug: String,
    pub caller: Option<AuthenticatedUser>,
}

/// A course as seen by one caller.
#[derive(Debug, Clone)]
pub struct CourseView {
    pub course: Course,
    /// Whether lesson videos, bodies and resources may be shown.
    pub content_unlocked: bool,
}

pub struct GetCourseHandler {
    courses: Arc<dyn CourseRepository>,
    ledger: Arc<dyn EntitlementLedger>,
}

impl GetCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, ledger: Arc<dyn EntitlementLedger>) -> Self {
        Self { courses, ledger }
    }

    pub async fn handle(&self, query: GetCourseQuery) -> Result<CourseView, DomainError> {
        let not_found = || DomainError::not_found(ErrorCode::CourseNotFound, "Course", &query.slug);
        let course = self
            .courses
            .find_by_slug(&query.slug)
            .await?
            .ok_or_else(not_found)?;

        let manages = query
            .caller
            .as_ref()
            .is_some_and(|c| course.check_can_manage(c).is_ok());
        if !course.is_published() && !manages {
            return Err(not_found());
        }

        let content_unlocked = match (&query.caller, manages) {
            (_, true) => true,
            (Some(caller), false) => self
                .ledger
                .find(&caller.id, &Product::Course(course.id))
                .await?
                .is_some(),
            (None, false) => false,
        };
        Ok(CourseView {
            course,
            content_unlocked,
        })
    }
}

/// Lists webinars that have not ended and still run.
pub struct ListUpcomingWebinarsHandler {
    webinars: Arc<dyn WebinarRepository>,
}

impl ListUpcomingWebinarsHandler {
    pub fn new(webinars: Arc<dyn WebinarRepository>) -> Self {
        Self { webinars }
    }

    pub async fn handle(&self) -> Result<Vec<Webinar>, DomainError> {
        let now = Timestamp::now();
        let webinars = self.webinars.list().await?;
        Ok(webinars.into_iter().filter(|w| w.is_upcoming(&now)).collect())
    }
}

pub struct GetWebinarHandler {
    webinars: Arc<dyn WebinarRepository>,
}

impl GetWebinarHandler {
    pub fn new(webinars: Arc<dyn WebinarRepository>) -> Self {
        Self { webinars }
    }

    pub async fn handle(&self, slug: &str) -> Result<Webinar, DomainError> {
        self.webinars
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::WebinarNotFound, "Webinar", slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::catalog::test_support::course_with_modules;
    use crate::domain::foundation::{Role, UserId};

    fn caller(id: &str, role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), format!("{}@example.com", id), None, role)
    }

    async fn store_with_draft() -> (Arc<InMemoryStore>, Course) {
        let store = Arc::new(InMemoryStore::new());
        let course = course_with_modules(&[1]);
        CourseRepository::save(store.as_ref(), &course).await.unwrap();
        (store, course)
    }

    #[tokio::test]
    async fn draft_is_hidden_from_public() {
        let (store, course) = store_with_draft().await;
        let handler = GetCourseHandler::new(store.clone(), store);

        let err = handler
            .handle(GetCourseQuery {
                slug: course.slug.as_str().to_string(),
                caller: Some(caller("someone", Role::Student)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CourseNotFound);
    }

    #[tokio::test]
    async fn draft_is_visible_to_owner_and_admin() {
        let (store, course) = store_with_draft().await;
        let handler = GetCourseHandler::new(store.clone(), store);

        for viewer in [
            caller(course.instructor_id.as_str(), Role::Instructor),
            caller("root", Role::Admin),
        ] {
            let found = handler
                .handle(GetCourseQuery {
                    slug: course.slug.as_str().to_string(),
                    caller: Some(viewer),
                })
                .await
                .unwrap();
            assert_eq!(found.course.id, course.id);
            assert!(found.content_unlocked);
        }
    }

    #[tokio::test]
    async fn listing_shows_published_only() {
        let (store, _draft) = store_with_draft().await;
        let handler = ListCoursesHandler::new(store);

        let listed = handler.handle(ListCoursesQuery::default()).await.unwrap();
        assert!(listed.is_empty());
    }
}
