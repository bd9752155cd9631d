//! PostgreSQL implementation of ProgressRepository.
//!
//! Rows are created by the entitlement ledger. Updates are guarded by the
//! `version` column: a write based on a stale read affects no rows.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, UserId};
use crate::domain::learning::LearningProgress;
use crate::ports::ProgressRepository;

use super::support::{db_error, doc};

#[derive(Clone)]
pub struct PostgresProgressRepository {
    pool: PgPool,
}

impl PostgresProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_progress(row: PgRow) -> Result<LearningProgress, DomainError> {
    let mut progress: LearningProgress = doc(&row)?;
    progress.version = row
        .try_get("version")
        .map_err(db_error("Failed to read progress version"))?;
    Ok(progress)
}

#[async_trait]
impl ProgressRepository for PostgresProgressRepository {
    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<LearningProgress>, DomainError> {
        sqlx::query(
            "SELECT doc, version FROM learning_progress WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch progress"))?
        .map(row_to_progress)
        .transpose()
    }

    async fn update(&self, progress: &LearningProgress) -> Result<i64, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE learning_progress SET
                percentage = $3,
                completed = $4,
                updated_at = $5,
                doc = $6,
                version = version + 1
            WHERE user_id = $1 AND course_id = $2 AND version = $7
            RETURNING version
            "#,
        )
        .bind(progress.user_id.as_str())
        .bind(progress.course_id.as_uuid())
        .bind(i16::from(progress.percentage.value()))
        .bind(progress.is_completed())
        .bind(progress.updated_at.as_datetime())
        .bind(Json(progress))
        .bind(progress.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update progress"))?;

        if let Some(row) = row {
            return row
                .try_get("version")
                .map_err(db_error("Failed to read progress version"));
        }

        match self.find(&progress.user_id, &progress.course_id).await? {
            Some(_) => Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                "Progress was updated concurrently; retry",
            )),
            None => Err(DomainError::not_found(
                ErrorCode::ProgressNotFound,
                "Progress",
                progress.course_id,
            )),
        }
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<LearningProgress>, DomainError> {
        let rows = sqlx::query(
            "SELECT doc, version FROM learning_progress WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list progress"))?;

        rows.into_iter().map(row_to_progress).collect()
    }
}
