//! PostgreSQL implementations of CourseRepository and WebinarRepository.
//!
//! The counters live in their own columns and are overlaid on the decoded
//! document, so `update` never touches them.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::catalog::{Course, Webinar};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, UserId, WebinarId};
use crate::ports::{CourseFilter, CourseRepository, WebinarRepository};

use super::support::{counter, db_error, doc, is_unique_violation, slug_taken};

#[derive(Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_course(row: PgRow) -> Result<Course, DomainError> {
    let mut course: Course = doc(&row)?;
    course.enrolled_count = counter(&row, "enrolled_count")?;
    Ok(course)
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                id, slug, status, level, instructor_id, enrolled_count, created_at, doc
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(course.slug.as_str())
        .bind(course.status.as_str())
        .bind(course.level.as_str())
        .bind(course.instructor_id.as_str())
        .bind(course.enrolled_count as i64)
        .bind(course.created_at.as_datetime())
        .bind(Json(course))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                slug_taken(course.slug.as_str())
            } else {
                db_error("Failed to insert course")(e)
            }
        })?;

        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE courses SET
                slug = $2,
                status = $3,
                level = $4,
                doc = $5
            WHERE id = $1
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(course.slug.as_str())
        .bind(course.status.as_str())
        .bind(course.level.as_str())
        .bind(Json(course))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                slug_taken(course.slug.as_str())
            } else {
                db_error("Failed to update course")(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::CourseNotFound, "Course", course.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        sqlx::query("SELECT doc, enrolled_count FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch course"))?
            .map(row_to_course)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>, DomainError> {
        sqlx::query("SELECT doc, enrolled_count FROM courses WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch course by slug"))?
            .map(row_to_course)
            .transpose()
    }

    async fn list(&self, filter: &CourseFilter) -> Result<Vec<Course>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT doc, enrolled_count FROM courses
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR level = $2)
              AND ($3::TEXT IS NULL OR instructor_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.level.map(|l| l.as_str()))
        .bind(filter.instructor_id.as_ref().map(|i| i.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list courses"))?;

        rows.into_iter().map(row_to_course).collect()
    }

    async fn delete(&self, id: &CourseId) -> Result<(), DomainError> {
        let course = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::CourseNotFound, "Course", id))?;
        course.check_deletable()?;

        // The counter guard closes the race with a concurrent first enrollment.
        let result = sqlx::query("DELETE FROM courses WHERE id = $1 AND enrolled_count = 0")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete course"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                "Course has enrollments and cannot be deleted; archive it instead",
            ));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresWebinarRepository {
    pool: PgPool,
}

impl PostgresWebinarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_webinar(row: PgRow) -> Result<Webinar, DomainError> {
    let mut webinar: Webinar = doc(&row)?;
    webinar.registered_count = counter(&row, "registered_count")?;
    Ok(webinar)
}

#[async_trait]
impl WebinarRepository for PostgresWebinarRepository {
    async fn save(&self, webinar: &Webinar) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO webinars (
                id, slug, status, host_id, starts_at, registered_count, doc
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(webinar.id.as_uuid())
        .bind(webinar.slug.as_str())
        .bind(webinar.status.as_str())
        .bind(webinar.host_id.as_str())
        .bind(webinar.starts_at.as_datetime())
        .bind(webinar.registered_count as i64)
        .bind(Json(webinar))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                slug_taken(webinar.slug.as_str())
            } else {
                db_error("Failed to insert webinar")(e)
            }
        })?;

        Ok(())
    }

    async fn update(&self, webinar: &Webinar) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE webinars SET
                status = $2,
                starts_at = $3,
                doc = $4
            WHERE id = $1
            "#,
        )
        .bind(webinar.id.as_uuid())
        .bind(webinar.status.as_str())
        .bind(webinar.starts_at.as_datetime())
        .bind(Json(webinar))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update webinar"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                ErrorCode::WebinarNotFound,
                "Webinar",
                webinar.id,
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &WebinarId) -> Result<Option<Webinar>, DomainError> {
        sqlx::query("SELECT doc, registered_count FROM webinars WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch webinar"))?
            .map(row_to_webinar)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Webinar>, DomainError> {
        sqlx::query("SELECT doc, registered_count FROM webinars WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch webinar by slug"))?
            .map(row_to_webinar)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Webinar>, DomainError> {
        let rows = sqlx::query("SELECT doc, registered_count FROM webinars ORDER BY starts_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list webinars"))?;

        rows.into_iter().map(row_to_webinar).collect()
    }

    async fn list_by_host(&self, host_id: &UserId) -> Result<Vec<Webinar>, DomainError> {
        let rows = sqlx::query(
            "SELECT doc, registered_count FROM webinars WHERE host_id = $1 ORDER BY starts_at ASC",
        )
        .bind(host_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list webinars by host"))?;

        rows.into_iter().map(row_to_webinar).collect()
    }
}
