use std::sync::Arc;

use tracing::info;

use crate::domain::content::{ContentDraft, ContentItem, ContentKind};
use crate::domain::foundation::{AuthenticatedUser, ContentId, DomainError, ErrorCode, Slug};
use crate::ports::ContentRepository;

#[derive(Debug, Clone)]
pub struct CreateContentCommand {
    pub caller: AuthenticatedUser,
    pub kind: ContentKind,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub draft: ContentDraft,
}

pub struct CreateContentHandler {
    content: Arc<dyn ContentRepository>,
}

impl CreateContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    pub async fn handle(&self, cmd: CreateContentCommand) -> Result<ContentItem, DomainError> {
        let slug = match &cmd.slug {
            Some(slug) => Slug::new(slug.as_str())?,
            None => Slug::from_title(&cmd.draft.title)?,
        };
        let item = ContentItem::create(cmd.kind, slug, cmd.caller.id, cmd.draft)?;
        self.content.save(&item).await?;

        info!(content_id = %item.id, kind = item.kind.as_str(), slug = %item.slug.as_str(), "content created");
        Ok(item)
    }
}

#[derive(Debug, Clone)]
pub enum ContentEdit {
    Revise(ContentDraft),
    Publish,
    Unpublish,
}

#[derive(Debug, Clone)]
pub struct EditContentCommand {
    pub id: ContentId,
    pub edit: ContentEdit,
}

pub struct EditContentHandler {
    content: Arc<dyn ContentRepository>,
}

impl EditContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    pub async fn handle(&self, cmd: EditContentCommand) -> Result<ContentItem, DomainError> {
        let mut item = self
            .content
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ContentNotFound, "Content", cmd.id))?;

        match cmd.edit {
            ContentEdit::Revise(draft) => item.revise(draft)?,
            ContentEdit::Publish => {
                item.publish()?;
                info!(content_id = %item.id, slug = %item.slug.as_str(), "content published");
            }
            ContentEdit::Unpublish => item.unpublish()?,
        }
        self.content.update(&item).await?;
        Ok(item)
    }
}

pub struct DeleteContentHandler {
    content: Arc<dyn ContentRepository>,
}

impl DeleteContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    pub async fn handle(&self, id: ContentId) -> Result<(), DomainError> {
        self.content.delete(&id).await?;
        info!(content_id = %id, "content deleted");
        Ok(())
    }
}

pub struct ListContentHandler {
    content: Arc<dyn ContentRepository>,
}

impl ListContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    pub async fn handle(&self, kind: ContentKind) -> Result<Vec<ContentItem>, DomainError> {
        self.content.list(kind, false).await
    }
}
