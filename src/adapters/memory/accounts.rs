use async_trait::async_trait;

use crate::domain::commerce::{OrderStatus, ProductKind};
use crate::domain::content::{ContentItem, ContentKind};
use crate::domain::foundation::{ContentId, DomainError, ErrorCode, NotificationId, Role, UserId};
use crate::domain::notification::Notification;
use crate::domain::user::UserAccount;
use crate::ports::{
    AnalyticsReader, ContentRepository, NotificationRepository, Page, PlatformStats,
    UserRepository,
};

use super::InMemoryStore;

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.lock().await.users.get(id).cloned())
    }

    async fn upsert(&self, account: &UserAccount) -> Result<(), DomainError> {
        self.lock()
            .await
            .users
            .insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn list(&self, role: Option<Role>, page: Page) -> Result<Vec<UserAccount>, DomainError> {
        let mut users: Vec<UserAccount> = self
            .lock()
            .await
            .users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        self.lock().await.notifications.push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError> {
        let state = self.lock().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| &n.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let state = self.lock().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| &n.user_id == user_id && !n.read)
            .count() as u64)
    }

    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| &n.id == id && &n.user_id == user_id)
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::NotificationNotFound, "Notification", id)
            })?;
        notification.mark_read();
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryStore {
    async fn save(&self, item: &ContentItem) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        if state
            .content
            .values()
            .any(|c| c.kind == item.kind && c.slug == item.slug)
        {
            return Err(
                DomainError::new(ErrorCode::AlreadyExists, "Slug is already in use")
                    .with_detail("slug", item.slug.as_str()),
            );
        }
        state.content.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(&self, item: &ContentItem) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        let stored = state
            .content
            .get_mut(&item.id)
            .ok_or_else(|| DomainError::not_found(ErrorCode::ContentNotFound, "Content", item.id))?;
        *stored = item.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<ContentItem>, DomainError> {
        Ok(self.lock().await.content.get(id).cloned())
    }

    async fn find_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> Result<Option<ContentItem>, DomainError> {
        Ok(self
            .lock()
            .await
            .content
            .values()
            .find(|c| c.kind == kind && c.slug.as_str() == slug)
            .cloned())
    }

    async fn list(
        &self,
        kind: ContentKind,
        published_only: bool,
    ) -> Result<Vec<ContentItem>, DomainError> {
        let mut items: Vec<ContentItem> = self
            .lock()
            .await
            .content
            .values()
            .filter(|c| c.kind == kind && (!published_only || c.is_published()))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(items)
    }

    async fn delete(&self, id: &ContentId) -> Result<(), DomainError> {
        self.lock()
            .await
            .content
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(ErrorCode::ContentNotFound, "Content", id))
    }
}

#[async_trait]
impl AnalyticsReader for InMemoryStore {
    async fn platform_stats(&self) -> Result<PlatformStats, DomainError> {
        let state = self.lock().await;
        let mut stats = PlatformStats::default();

        for user in state.users.values() {
            *stats
                .users_by_role
                .entry(user.role.as_str().to_string())
                .or_default() += 1;
        }
        for course in state.courses.values() {
            *stats
                .courses_by_status
                .entry(course.status.as_str().to_string())
                .or_default() += 1;
        }
        for entitlement in state.entitlements.values() {
            match entitlement.product.kind() {
                ProductKind::Course => stats.total_enrollments += 1,
                ProductKind::Webinar => stats.webinar_registrations += 1,
            }
        }
        for order in state
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Entitled)
        {
            *stats
                .revenue
                .entry(order.amount.currency().to_string())
                .or_default() += order.amount.amount();
        }
        if !state.progress.is_empty() {
            let total: u64 = state
                .progress
                .values()
                .map(|p| u64::from(p.percentage.value()))
                .sum();
            stats.average_completion = total as f64 / state.progress.len() as f64;
        }
        stats.completed_courses = state
            .progress
            .values()
            .filter(|p| p.is_completed())
            .count() as u64;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AuthenticatedUser;
    use crate::domain::notification::NotificationKind;

    fn user(id: &str, role: Role) -> UserAccount {
        UserAccount::register(&AuthenticatedUser::new(
            UserId::new(id).unwrap(),
            format!("{}@example.com", id),
            None,
            role,
        ))
    }

    #[tokio::test]
    async fn list_filters_by_role() {
        let store = InMemoryStore::new();
        store.upsert(&user("a", Role::Student)).await.unwrap();
        store.upsert(&user("b", Role::Instructor)).await.unwrap();

        let listed = UserRepository::list(&store, Some(Role::Instructor), Page::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_str(), "b");
    }

    #[tokio::test]
    async fn mark_read_is_scoped_to_owner() {
        let store = InMemoryStore::new();
        let owner = UserId::new("owner").unwrap();
        let note = Notification::new(owner.clone(), NotificationKind::System, "Hi", "Body");
        NotificationRepository::save(&store, &note).await.unwrap();

        let stranger = UserId::new("stranger").unwrap();
        let err = store.mark_read(&stranger, &note.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotificationNotFound);

        store.mark_read(&owner, &note.id).await.unwrap();
        assert_eq!(store.count_unread(&owner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stats_on_empty_store_are_zero() {
        let store = InMemoryStore::new();
        let stats = store.platform_stats().await.unwrap();
        assert_eq!(stats, PlatformStats::default());
        assert_eq!(stats.average_completion, 0.0);
    }

    #[tokio::test]
    async fn stats_count_users_by_role() {
        let store = InMemoryStore::new();
        store.upsert(&user("a", Role::Student)).await.unwrap();
        store.upsert(&user("b", Role::Student)).await.unwrap();
        store.upsert(&user("c", Role::Admin)).await.unwrap();

        let stats = store.platform_stats().await.unwrap();
        assert_eq!(stats.users_by_role.get("student"), Some(&2));
        assert_eq!(stats.users_by_role.get("admin"), Some(&1));
        assert_eq!(stats.total_users(), 3);
    }
}
