//! Blog post and page repository port.

use async_trait::async_trait;

use crate::domain::content::{ContentItem, ContentKind};
use crate::domain::foundation::{ContentId, DomainError};

#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// # Errors
    ///
    /// - `AlreadyExists` if the slug is taken for this kind
    async fn save(&self, item: &ContentItem) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `ContentNotFound` if the item does not exist
    async fn update(&self, item: &ContentItem) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<ContentItem>, DomainError>;

    async fn find_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> Result<Option<ContentItem>, DomainError>;

    /// Items of one kind, newest published (then created) first.
    async fn list(
        &self,
        kind: ContentKind,
        published_only: bool,
    ) -> Result<Vec<ContentItem>, DomainError>;

    /// # Errors
    ///
    /// - `ContentNotFound` if the item does not exist
    async fn delete(&self, id: &ContentId) -> Result<(), DomainError>;
}
