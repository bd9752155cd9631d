use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, UserId};
use crate::domain::learning::LearningProgress;
use crate::ports::ProgressRepository;

use super::InMemoryStore;

#[async_trait]
impl ProgressRepository for InMemoryStore {
    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<LearningProgress>, DomainError> {
        Ok(self
            .lock()
            .await
            .progress
            .get(&(user_id.clone(), *course_id))
            .cloned())
    }

    async fn update(&self, progress: &LearningProgress) -> Result<i64, DomainError> {
        let mut state = self.lock().await;
        let key = (progress.user_id.clone(), progress.course_id);
        let stored = state.progress.get_mut(&key).ok_or_else(|| {
            DomainError::not_found(ErrorCode::ProgressNotFound, "Progress", progress.course_id)
        })?;
        if stored.version != progress.version {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                "Progress was updated concurrently; retry",
            ));
        }
        *stored = progress.clone();
        stored.version += 1;
        Ok(stored.version)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<LearningProgress>, DomainError> {
        let mut records: Vec<LearningProgress> = self
            .lock()
            .await
            .progress
            .values()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CourseId;

    async fn seeded() -> (InMemoryStore, LearningProgress) {
        let store = InMemoryStore::new();
        let progress = LearningProgress::start(UserId::new("u1").unwrap(), CourseId::new());
        store.lock().await.progress.insert(
            (progress.user_id.clone(), progress.course_id),
            progress.clone(),
        );
        (store, progress)
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let (store, progress) = seeded().await;
        assert_eq!(store.update(&progress).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let (store, progress) = seeded().await;
        store.update(&progress).await.unwrap();

        let err = store.update(&progress).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrentModification);
    }

    #[tokio::test]
    async fn update_without_record_is_not_found() {
        let store = InMemoryStore::new();
        let progress = LearningProgress::start(UserId::new("u1").unwrap(), CourseId::new());
        let err = store.update(&progress).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProgressNotFound);
    }
}
