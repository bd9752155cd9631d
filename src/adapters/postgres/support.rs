//! Shared helpers for the PostgreSQL adapters.

use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Maps a driver error to `DatabaseError`, tagged with what we were doing.
pub(super) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(super) fn slug_taken(slug: &str) -> DomainError {
    DomainError::new(ErrorCode::AlreadyExists, "Slug is already in use").with_detail("slug", slug)
}

/// Decodes the JSONB document column of a row.
pub(super) fn doc<T: DeserializeOwned>(row: &PgRow) -> Result<T, DomainError> {
    let Json(value) = row
        .try_get::<Json<T>, _>("doc")
        .map_err(db_error("Failed to decode document"))?;
    Ok(value)
}

/// Reads a non-negative BIGINT counter column.
pub(super) fn counter(row: &PgRow, column: &str) -> Result<u64, DomainError> {
    let value: i64 = row
        .try_get(column)
        .map_err(db_error("Failed to read counter"))?;
    Ok(value.max(0) as u64)
}
