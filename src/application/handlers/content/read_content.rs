use std::sync::Arc;

use crate::domain::content::{ContentItem, ContentKind};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::ContentRepository;

pub struct ListPublishedPostsHandler {
    content: Arc<dyn ContentRepository>,
}

impl ListPublishedPostsHandler {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    pub async fn handle(&self) -> Result<Vec<ContentItem>, DomainError> {
        self.content.list(ContentKind::Post, true).await
    }
}

/// Drafts are reported as not found.
pub struct GetPublishedContentHandler {
    content: Arc<dyn ContentRepository>,
}

impl GetPublishedContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    pub async fn handle(&self, kind: ContentKind, slug: &str) -> Result<ContentItem, DomainError> {
        self.content
            .find_by_slug(kind, slug)
            .await?
            .filter(ContentItem::is_published)
            .ok_or_else(|| DomainError::not_found(ErrorCode::ContentNotFound, kind.as_str(), slug))
    }
}
