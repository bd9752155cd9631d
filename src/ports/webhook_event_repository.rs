//! WebhookEventRepository port - tracks processed Razorpay deliveries.
//!
//! Razorpay may deliver the same webhook more than once (timeouts, non-2xx
//! responses, lost acknowledgements). Every delivery is keyed and stored
//! with its payload and outcome so replays are skipped and auditable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::foundation::DomainError;

/// Outcome stored for a processed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookRecordStatus {
    Success,
    Ignored,
    Failed,
}

impl WebhookRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookRecordStatus::Success => "success",
            WebhookRecordStatus::Ignored => "ignored",
            WebhookRecordStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "ignored" => Some(Self::Ignored),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Record of a processed webhook delivery.
#[derive(Debug, Clone)]
pub struct WebhookEventRecord {
    /// Idempotency key (delivery id, or `event:payment_id`).
    pub event_id: String,

    /// Razorpay event name, e.g. `payment.captured`.
    pub event_type: String,

    pub processed_at: DateTime<Utc>,

    pub result: WebhookRecordStatus,

    /// Reason for an ignored or failed delivery.
    pub error_message: Option<String>,

    /// Original payload for debugging.
    pub payload: serde_json::Value,
}

impl WebhookEventRecord {
    fn new(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        result: WebhookRecordStatus,
        error_message: Option<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result,
            error_message,
            payload,
        }
    }

    pub fn success(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self::new(event_id, event_type, WebhookRecordStatus::Success, None, payload)
    }

    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self::new(
            event_id,
            event_type,
            WebhookRecordStatus::Ignored,
            Some(reason.into()),
            payload,
        )
    }

    pub fn failed(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        error: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self::new(
            event_id,
            event_type,
            WebhookRecordStatus::Failed,
            Some(error.into()),
            payload,
        )
    }
}

/// Result of attempting to save a webhook record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// First time seeing this key.
    Inserted,
    /// Another delivery already stored this key.
    AlreadyExists,
}

/// Port for storing and retrieving processed webhook deliveries.
///
/// Implementations must use a uniqueness constraint on `event_id` so
/// concurrent duplicates cannot both insert.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Insert-if-absent.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;
}

#[async_trait]
impl<T: WebhookEventRepository + ?Sized> WebhookEventRepository for Arc<T> {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError> {
        (**self).find_by_event_id(event_id).await
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        (**self).save(record).await
    }
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResult {
    /// Event was acted on.
    Processed,
    /// Event was acknowledged without action.
    Ignored(String),
    /// Duplicate delivery, skipped.
    AlreadyProcessed,
}
