//! PostgreSQL implementations of the user, notification and content ports.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::content::{ContentItem, ContentKind};
use crate::domain::foundation::{ContentId, DomainError, ErrorCode, NotificationId, Role, UserId};
use crate::domain::notification::Notification;
use crate::domain::user::UserAccount;
use crate::ports::{ContentRepository, NotificationRepository, Page, UserRepository};

use super::support::{db_error, doc, is_unique_violation, slug_taken};

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        sqlx::query("SELECT doc FROM users WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch user"))?
            .map(|row| doc(&row))
            .transpose()
    }

    async fn upsert(&self, account: &UserAccount) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, role, created_at, doc)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                role = EXCLUDED.role,
                doc = EXCLUDED.doc
            "#,
        )
        .bind(account.id.as_str())
        .bind(&account.email)
        .bind(account.role.as_str())
        .bind(account.created_at.as_datetime())
        .bind(Json(account))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to upsert user"))?;
        Ok(())
    }

    async fn list(&self, role: Option<Role>, page: Page) -> Result<Vec<UserAccount>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM users
            WHERE ($1::TEXT IS NULL OR role = $1)
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(role.map(|r| r.as_str()))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list users"))?;

        rows.iter().map(doc).collect()
    }
}

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, read, created_at, doc) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(notification.id.as_uuid())
        .bind(notification.user_id.as_str())
        .bind(notification.read)
        .bind(notification.created_at.as_datetime())
        .bind(Json(notification))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert notification"))?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows = sqlx::query(
            "SELECT doc FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list notifications"))?;

        rows.iter().map(doc).collect()
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read")
                .bind(user_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count unread notifications"))?;
        Ok(count.max(0) as u64)
    }

    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications SET
                read = TRUE,
                doc = jsonb_set(doc, '{read}', 'true'::jsonb)
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to mark notification read"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                ErrorCode::NotificationNotFound,
                "Notification",
                id,
            ));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_content(row: PgRow) -> Result<ContentItem, DomainError> {
    doc(&row)
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn save(&self, item: &ContentItem) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO content_items (id, kind, slug, status, published_at, created_at, doc)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.kind.as_str())
        .bind(item.slug.as_str())
        .bind(item.status.as_str())
        .bind(item.published_at.as_ref().map(|t| *t.as_datetime()))
        .bind(item.created_at.as_datetime())
        .bind(Json(item))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                slug_taken(item.slug.as_str())
            } else {
                db_error("Failed to insert content")(e)
            }
        })?;
        Ok(())
    }

    async fn update(&self, item: &ContentItem) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE content_items SET
                status = $2,
                published_at = $3,
                doc = $4
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.status.as_str())
        .bind(item.published_at.as_ref().map(|t| *t.as_datetime()))
        .bind(Json(item))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update content"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::ContentNotFound, "Content", item.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<ContentItem>, DomainError> {
        sqlx::query("SELECT doc FROM content_items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch content"))?
            .map(row_to_content)
            .transpose()
    }

    async fn find_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> Result<Option<ContentItem>, DomainError> {
        sqlx::query("SELECT doc FROM content_items WHERE kind = $1 AND slug = $2")
            .bind(kind.as_str())
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch content by slug"))?
            .map(row_to_content)
            .transpose()
    }

    async fn list(
        &self,
        kind: ContentKind,
        published_only: bool,
    ) -> Result<Vec<ContentItem>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM content_items
            WHERE kind = $1 AND (NOT $2 OR status = 'published')
            ORDER BY published_at DESC NULLS LAST, created_at DESC
            "#,
        )
        .bind(kind.as_str())
        .bind(published_only)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list content"))?;

        rows.into_iter().map(row_to_content).collect()
    }

    async fn delete(&self, id: &ContentId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete content"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::ContentNotFound, "Content", id));
        }
        Ok(())
    }
}
