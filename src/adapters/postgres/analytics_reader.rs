//! PostgreSQL implementation of AnalyticsReader.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::ports::{AnalyticsReader, PlatformStats};

use super::support::db_error;

#[derive(Clone)]
pub struct PostgresAnalyticsReader {
    pool: PgPool,
}

impl PostgresAnalyticsReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn grouped(&self, sql: &'static str) -> Result<BTreeMap<String, u64>, DomainError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load platform stats"))?;
        Ok(rows
            .into_iter()
            .map(|(key, count)| (key, count.max(0) as u64))
            .collect())
    }
}

#[async_trait]
impl AnalyticsReader for PostgresAnalyticsReader {
    async fn platform_stats(&self) -> Result<PlatformStats, DomainError> {
        let users_by_role = self
            .grouped("SELECT role, COUNT(*) FROM users GROUP BY role")
            .await?;
        let courses_by_status = self
            .grouped("SELECT status, COUNT(*) FROM courses GROUP BY status")
            .await?;
        let entitlements = self
            .grouped("SELECT product_kind, COUNT(*) FROM entitlements GROUP BY product_kind")
            .await?;
        let revenue = self
            .grouped(
                r#"
                SELECT currency, SUM(amount)::BIGINT FROM payment_orders
                WHERE status = 'entitled'
                GROUP BY currency
                "#,
            )
            .await?;

        let (average, completed): (f64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(AVG(percentage)::FLOAT8, 0),
                   COUNT(*) FILTER (WHERE completed)
            FROM learning_progress
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to load completion stats"))?;

        Ok(PlatformStats {
            users_by_role,
            courses_by_status,
            total_enrollments: entitlements.get("course").copied().unwrap_or(0),
            webinar_registrations: entitlements.get("webinar").copied().unwrap_or(0),
            revenue,
            average_completion: average,
            completed_courses: completed.max(0) as u64,
        })
    }
}
