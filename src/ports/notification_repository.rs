//! Notification repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NotificationId, UserId};
use crate::domain::notification::Notification;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError>;

    /// Newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError>;

    async fn count_unread(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// Marks one of the user's notifications read.
    ///
    /// # Errors
    ///
    /// - `NotificationNotFound` if it does not exist or belongs to someone else
    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<(), DomainError>;
}
