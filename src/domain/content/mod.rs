//! Editorial content: blog posts and static pages.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ContentId, DomainError, ErrorCode, Slug, StateMachine, Timestamp, UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Post,
    Page,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Page => "page",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Published,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
        }
    }
}

impl StateMachine for ContentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self != target
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ContentStatus::Draft => vec![ContentStatus::Published],
            ContentStatus::Published => vec![ContentStatus::Draft],
        }
    }
}

/// A blog post or page. Slugs are unique per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub kind: ContentKind,
    pub slug: Slug,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub tags: Vec<String>,
    pub author_id: UserId,
    pub status: ContentStatus,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Editable content fields.
#[derive(Debug, Clone, Default)]
pub struct ContentDraft {
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub tags: Vec<String>,
}

impl ContentDraft {
    fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "title cannot be empty"));
        }
        if self.body.trim().is_empty() {
            return Err(DomainError::validation("body", "body cannot be empty"));
        }
        Ok(())
    }
}

impl ContentItem {
    pub fn create(
        kind: ContentKind,
        slug: Slug,
        author_id: UserId,
        draft: ContentDraft,
    ) -> Result<Self, DomainError> {
        draft.validate()?;
        let now = Timestamp::now();
        Ok(Self {
            id: ContentId::new(),
            kind,
            slug,
            title: draft.title,
            excerpt: draft.excerpt,
            body: draft.body,
            tags: normalize_tags(draft.tags),
            author_id,
            status: ContentStatus::Draft,
            published_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn revise(&mut self, draft: ContentDraft) -> Result<(), DomainError> {
        draft.validate()?;
        self.title = draft.title;
        self.excerpt = draft.excerpt;
        self.body = draft.body;
        self.tags = normalize_tags(draft.tags);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn publish(&mut self) -> Result<(), DomainError> {
        self.transition(ContentStatus::Published)?;
        self.published_at = Some(Timestamp::now());
        Ok(())
    }

    pub fn unpublish(&mut self) -> Result<(), DomainError> {
        self.transition(ContentStatus::Draft)
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    fn transition(&mut self, target: ContentStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
