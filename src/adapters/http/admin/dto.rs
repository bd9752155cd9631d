//! HTTP DTOs for admin endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::content::{ContentDraft, ContentItem, ContentKind, ContentStatus};
use crate::domain::foundation::Role;
use crate::domain::user::UserAccount;
use crate::ports::PlatformStats;

use crate::adapters::http::catalog::dto::rfc3339;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersParams {
    pub role: Option<Role>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentKindParams {
    pub kind: ContentKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentRequest {
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<ContentRequest> for ContentDraft {
    fn from(req: ContentRequest) -> Self {
        Self {
            title: req.title,
            excerpt: req.excerpt,
            body: req.body,
            tags: req.tags,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentRequest {
    pub kind: ContentKind,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub content: ContentRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    pub total_users: u64,
    #[serde(flatten)]
    pub stats: PlatformStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub created_at: String,
    pub last_seen_at: String,
}

impl From<&UserAccount> for UserResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            role: account.role,
            created_at: rfc3339(&account.created_at),
            last_seen_at: rfc3339(&account.last_seen_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    pub id: String,
    pub kind: ContentKind,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub tags: Vec<String>,
    pub author_id: String,
    pub status: ContentStatus,
    pub published_at: Option<String>,
    pub updated_at: String,
}

impl From<&ContentItem> for ContentResponse {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id.to_string(),
            kind: item.kind,
            slug: item.slug.as_str().to_string(),
            title: item.title.clone(),
            excerpt: item.excerpt.clone(),
            body: item.body.clone(),
            tags: item.tags.clone(),
            author_id: item.author_id.to_string(),
            status: item.status,
            published_at: item.published_at.as_ref().map(rfc3339),
            updated_at: rfc3339(&item.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_content_request_flattens_fields() {
        let req: CreateContentRequest = serde_json::from_str(
            r#"{"kind": "post", "title": "Reading Candles", "body": "..."}"#,
        )
        .unwrap();
        assert_eq!(req.kind, ContentKind::Post);
        assert!(req.slug.is_none());
        assert_eq!(req.content.title, "Reading Candles");
    }

    #[test]
    fn role_params_are_lowercase() {
        let req: ChangeRoleRequest = serde_json::from_str(r#"{"role": "instructor"}"#).unwrap();
        assert_eq!(req.role, Role::Instructor);
    }
}
