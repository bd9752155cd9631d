//! PostgreSQL implementations of the commerce ports: orders, the
//! entitlement ledger and webhook delivery records.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::catalog::Webinar;
use crate::domain::commerce::{
    Entitlement, EntitlementGrant, EntitlementSource, GrantOutcome, PaymentOrder, Product,
};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, OrderId, UserId, WebinarId};
use crate::domain::learning::LearningProgress;
use crate::domain::notification::Notification;
use crate::ports::{
    EntitlementLedger, OrderRepository, SaveResult, WebhookEventRecord, WebhookEventRepository,
    WebhookRecordStatus,
};

use super::support::{counter, db_error, doc};

// ════════════════════════════════════════════════════════════════════════════
// Orders
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_order(row: PgRow) -> Result<PaymentOrder, DomainError> {
    doc(&row)
}

async fn write_order(
    tx: &mut Transaction<'_, Postgres>,
    order: &PaymentOrder,
) -> Result<(), DomainError> {
    sqlx::query("UPDATE payment_orders SET status = $2, doc = $3 WHERE id = $1")
        .bind(order.id.as_str())
        .bind(order.status.as_str())
        .bind(Json(order))
        .execute(&mut **tx)
        .await
        .map_err(db_error("Failed to update order"))?;
    Ok(())
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn save(&self, order: &PaymentOrder) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payment_orders (id, user_id, status, amount, currency, created_at, doc)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id.as_str())
        .bind(order.user_id.as_str())
        .bind(order.status.as_str())
        .bind(order.amount.amount() as i64)
        .bind(order.amount.currency())
        .bind(order.created_at.as_datetime())
        .bind(Json(order))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert order"))?;
        Ok(())
    }

    async fn update(&self, order: &PaymentOrder) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE payment_orders SET status = $2, doc = $3 WHERE id = $1")
            .bind(order.id.as_str())
            .bind(order.status.as_str())
            .bind(Json(order))
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update order"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::OrderNotFound, "Order", &order.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<PaymentOrder>, DomainError> {
        sqlx::query("SELECT doc FROM payment_orders WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch order"))?
            .map(row_to_order)
            .transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<PaymentOrder>, DomainError> {
        let rows = sqlx::query(
            "SELECT doc FROM payment_orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list orders"))?;

        rows.into_iter().map(row_to_order).collect()
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<PaymentOrder>, DomainError> {
        let rows = sqlx::query("SELECT doc FROM payment_orders ORDER BY created_at DESC LIMIT $1")
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list recent orders"))?;

        rows.into_iter().map(row_to_order).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Entitlement ledger
// ════════════════════════════════════════════════════════════════════════════

/// Applies grants in one transaction.
///
/// The entitlement insert uses `ON CONFLICT DO NOTHING` on the
/// (user, product) key, so concurrent duplicate grants serialise on that
/// row and only the first one increments counters.
#[derive(Clone)]
pub struct PostgresEntitlementLedger {
    pool: PgPool,
}

impl PostgresEntitlementLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn source_label(source: &EntitlementSource) -> &'static str {
    match source {
        EntitlementSource::Free => "free",
        EntitlementSource::Order { .. } => "order",
    }
}

async fn settle_order(
    tx: &mut Transaction<'_, Postgres>,
    order_id: &OrderId,
) -> Result<PaymentOrder, DomainError> {
    let row = sqlx::query("SELECT doc FROM payment_orders WHERE id = $1 FOR UPDATE")
        .bind(order_id.as_str())
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_error("Failed to lock order"))?
        .ok_or_else(|| DomainError::not_found(ErrorCode::OrderNotFound, "Order", order_id))?;
    let mut order = row_to_order(row)?;
    order.mark_entitled()?;
    Ok(order)
}

async fn enroll(
    tx: &mut Transaction<'_, Postgres>,
    entitlement: &Entitlement,
    course_id: CourseId,
) -> Result<(), DomainError> {
    let result =
        sqlx::query("UPDATE courses SET enrolled_count = enrolled_count + 1 WHERE id = $1")
            .bind(course_id.as_uuid())
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to increment enrollment count"))?;
    if result.rows_affected() == 0 {
        return Err(DomainError::not_found(ErrorCode::CourseNotFound, "Course", course_id));
    }

    let progress = LearningProgress::start(entitlement.user_id.clone(), course_id);
    sqlx::query(
        r#"
        INSERT INTO learning_progress (user_id, course_id, percentage, completed, version, updated_at, doc)
        VALUES ($1, $2, 0, FALSE, 0, $3, $4)
        ON CONFLICT (user_id, course_id) DO NOTHING
        "#,
    )
    .bind(progress.user_id.as_str())
    .bind(course_id.as_uuid())
    .bind(progress.updated_at.as_datetime())
    .bind(Json(&progress))
    .execute(&mut **tx)
    .await
    .map_err(db_error("Failed to create progress record"))?;
    Ok(())
}

async fn register(
    tx: &mut Transaction<'_, Postgres>,
    webinar_id: WebinarId,
) -> Result<(), DomainError> {
    let row = sqlx::query("SELECT doc, registered_count FROM webinars WHERE id = $1 FOR UPDATE")
        .bind(webinar_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_error("Failed to lock webinar"))?
        .ok_or_else(|| DomainError::not_found(ErrorCode::WebinarNotFound, "Webinar", webinar_id))?;
    let mut webinar: Webinar = doc(&row)?;
    webinar.registered_count = counter(&row, "registered_count")?;
    webinar.check_open_for_registration()?;

    sqlx::query("UPDATE webinars SET registered_count = registered_count + 1 WHERE id = $1")
        .bind(webinar_id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(db_error("Failed to increment registration count"))?;
    Ok(())
}

async fn insert_notification(
    tx: &mut Transaction<'_, Postgres>,
    notification: &Notification,
) -> Result<(), DomainError> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, read, created_at, doc) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(notification.id.as_uuid())
    .bind(notification.user_id.as_str())
    .bind(notification.read)
    .bind(notification.created_at.as_datetime())
    .bind(Json(notification))
    .execute(&mut **tx)
    .await
    .map_err(db_error("Failed to insert notification"))?;
    Ok(())
}

#[async_trait]
impl EntitlementLedger for PostgresEntitlementLedger {
    async fn grant(&self, grant: EntitlementGrant) -> Result<GrantOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let settled_order = match grant.order_id() {
            Some(order_id) => Some(settle_order(&mut tx, order_id).await?),
            None => None,
        };

        let EntitlementGrant {
            entitlement,
            notification,
        } = grant;

        let inserted = sqlx::query(
            r#"
            INSERT INTO entitlements (user_id, product_kind, product_id, source, granted_at, doc)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, product_kind, product_id) DO NOTHING
            "#,
        )
        .bind(entitlement.user_id.as_str())
        .bind(entitlement.product.kind().as_str())
        .bind(product_uuid(&entitlement.product))
        .bind(source_label(&entitlement.source))
        .bind(entitlement.granted_at.as_datetime())
        .bind(Json(&entitlement))
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert entitlement"))?
        .rows_affected()
            == 1;

        if inserted {
            match entitlement.product {
                Product::Course(course_id) => enroll(&mut tx, &entitlement, course_id).await?,
                Product::Webinar(webinar_id) => register(&mut tx, webinar_id).await?,
            }
            insert_notification(&mut tx, &notification).await?;
        }
        if let Some(order) = &settled_order {
            write_order(&mut tx, order).await?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit grant"))?;

        Ok(if inserted {
            GrantOutcome::Granted
        } else {
            GrantOutcome::AlreadyGranted
        })
    }

    async fn find(
        &self,
        user_id: &UserId,
        product: &Product,
    ) -> Result<Option<Entitlement>, DomainError> {
        sqlx::query(
            "SELECT doc FROM entitlements WHERE user_id = $1 AND product_kind = $2 AND product_id = $3",
        )
        .bind(user_id.as_str())
        .bind(product.kind().as_str())
        .bind(product_uuid(product))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch entitlement"))?
        .map(|row| doc(&row))
        .transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Entitlement>, DomainError> {
        let rows = sqlx::query(
            "SELECT doc FROM entitlements WHERE user_id = $1 ORDER BY granted_at ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list entitlements"))?;

        rows.iter().map(doc).collect()
    }
}

fn product_uuid(product: &Product) -> uuid::Uuid {
    match product {
        Product::Course(id) => *id.as_uuid(),
        Product::Webinar(id) => *id.as_uuid(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Webhook delivery records
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresWebhookEventRepository {
    pool: PgPool,
}

impl PostgresWebhookEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: PgRow) -> Result<WebhookEventRecord, DomainError> {
    let result: String = row
        .try_get("result")
        .map_err(db_error("Failed to decode webhook record"))?;
    let Json(payload) = row
        .try_get::<Json<serde_json::Value>, _>("payload")
        .map_err(db_error("Failed to decode webhook payload"))?;
    Ok(WebhookEventRecord {
        event_id: row
            .try_get("event_id")
            .map_err(db_error("Failed to decode webhook record"))?,
        event_type: row
            .try_get("event_type")
            .map_err(db_error("Failed to decode webhook record"))?,
        processed_at: row
            .try_get("processed_at")
            .map_err(db_error("Failed to decode webhook record"))?,
        result: WebhookRecordStatus::parse(&result).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Unknown webhook result: {}", result),
            )
        })?,
        error_message: row
            .try_get("error_message")
            .map_err(db_error("Failed to decode webhook record"))?,
        payload,
    })
}

#[async_trait]
impl WebhookEventRepository for PostgresWebhookEventRepository {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError> {
        sqlx::query(
            r#"
            SELECT event_id, event_type, result, error_message, payload, processed_at
            FROM webhook_events WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch webhook event"))?
        .map(row_to_record)
        .transpose()
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO webhook_events (event_id, event_type, result, error_message, payload, processed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(&record.event_id)
        .bind(&record.event_type)
        .bind(record.result.as_str())
        .bind(record.error_message.as_deref())
        .bind(Json(&record.payload))
        .bind(record.processed_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record webhook event"))?;

        Ok(if result.rows_affected() == 1 {
            SaveResult::Inserted
        } else {
            SaveResult::AlreadyExists
        })
    }
}
