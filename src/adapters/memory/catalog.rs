use async_trait::async_trait;

use crate::domain::catalog::{Course, Webinar};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, UserId, WebinarId};
use crate::ports::{CourseFilter, CourseRepository, WebinarRepository};

use super::InMemoryStore;

fn slug_taken(slug: &str) -> DomainError {
    DomainError::new(ErrorCode::AlreadyExists, "Slug is already in use").with_detail("slug", slug)
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        if state.courses.values().any(|c| c.slug == course.slug) {
            return Err(slug_taken(course.slug.as_str()));
        }
        state.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        if state
            .courses
            .values()
            .any(|c| c.slug == course.slug && c.id != course.id)
        {
            return Err(slug_taken(course.slug.as_str()));
        }
        let stored = state
            .courses
            .get_mut(&course.id)
            .ok_or_else(|| DomainError::not_found(ErrorCode::CourseNotFound, "Course", course.id))?;
        let enrolled_count = stored.enrolled_count;
        *stored = course.clone();
        stored.enrolled_count = enrolled_count;
        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self.lock().await.courses.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>, DomainError> {
        Ok(self
            .lock()
            .await
            .courses
            .values()
            .find(|c| c.slug.as_str() == slug)
            .cloned())
    }

    async fn list(&self, filter: &CourseFilter) -> Result<Vec<Course>, DomainError> {
        let state = self.lock().await;
        let mut courses: Vec<Course> = state
            .courses
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    async fn delete(&self, id: &CourseId) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        let course = state
            .courses
            .get(id)
            .ok_or_else(|| DomainError::not_found(ErrorCode::CourseNotFound, "Course", id))?;
        course.check_deletable()?;
        state.courses.remove(id);
        Ok(())
    }
}

#[async_trait]
impl WebinarRepository for InMemoryStore {
    async fn save(&self, webinar: &Webinar) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        if state.webinars.values().any(|w| w.slug == webinar.slug) {
            return Err(slug_taken(webinar.slug.as_str()));
        }
        state.webinars.insert(webinar.id, webinar.clone());
        Ok(())
    }

    async fn update(&self, webinar: &Webinar) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        let stored = state.webinars.get_mut(&webinar.id).ok_or_else(|| {
            DomainError::not_found(ErrorCode::WebinarNotFound, "Webinar", webinar.id)
        })?;
        let registered_count = stored.registered_count;
        *stored = webinar.clone();
        stored.registered_count = registered_count;
        Ok(())
    }

    async fn find_by_id(&self, id: &WebinarId) -> Result<Option<Webinar>, DomainError> {
        Ok(self.lock().await.webinars.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Webinar>, DomainError> {
        Ok(self
            .lock()
            .await
            .webinars
            .values()
            .find(|w| w.slug.as_str() == slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Webinar>, DomainError> {
        let mut webinars: Vec<Webinar> = self.lock().await.webinars.values().cloned().collect();
        webinars.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(webinars)
    }

    async fn list_by_host(&self, host_id: &UserId) -> Result<Vec<Webinar>, DomainError> {
        let mut webinars: Vec<Webinar> = self
            .lock()
            .await
            .webinars
            .values()
            .filter(|w| &w.host_id == host_id)
            .cloned()
            .collect();
        webinars.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(webinars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::test_support::course_with_modules;
    use crate::domain::catalog::CourseStatus;
    use crate::domain::foundation::Slug;

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let store = InMemoryStore::new();
        let first = course_with_modules(&[1]);
        let mut second = course_with_modules(&[1]);
        second.slug = first.slug.clone();

        CourseRepository::save(&store, &first).await.unwrap();
        let err = CourseRepository::save(&store, &second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[tokio::test]
    async fn update_keeps_ledger_owned_counter() {
        let store = InMemoryStore::new();
        let mut course = course_with_modules(&[1]);
        CourseRepository::save(&store, &course).await.unwrap();
        store
            .lock()
            .await
            .courses
            .get_mut(&course.id)
            .unwrap()
            .enrolled_count = 3;

        course.title = "Renamed".to_string();
        CourseRepository::update(&store, &course).await.unwrap();

        let stored = CourseRepository::find_by_id(&store, &course.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Renamed");
        assert_eq!(stored.enrolled_count, 3);
    }

    #[tokio::test]
    async fn published_filter_hides_drafts() {
        let store = InMemoryStore::new();
        let draft = course_with_modules(&[1]);
        let mut live = course_with_modules(&[2]);
        live.slug = Slug::new("live-course").unwrap();
        live.publish().unwrap();
        CourseRepository::save(&store, &draft).await.unwrap();
        CourseRepository::save(&store, &live).await.unwrap();

        let listed = CourseRepository::list(&store, &CourseFilter::published(None))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, CourseStatus::Published);
    }

    #[tokio::test]
    async fn delete_refuses_enrolled_course() {
        let store = InMemoryStore::new();
        let mut course = course_with_modules(&[1]);
        course.enrolled_count = 1;
        CourseRepository::save(&store, &course).await.unwrap();

        let err = CourseRepository::delete(&store, &course.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }
}
