//! Razorpay webhook event types.
//!
//! Only the fields we act on are captured; everything else in the payload
//! is ignored on deserialization and kept in the raw JSON we store.

use serde::{Deserialize, Serialize};

/// Razorpay webhook envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayEvent {
    /// Always `"event"`.
    #[serde(default)]
    pub entity: String,

    #[serde(default)]
    pub account_id: Option<String>,

    /// Event name, e.g. `payment.captured`.
    pub event: String,

    /// Names of the entities present in `payload`.
    #[serde(default)]
    pub contains: Vec<String>,

    #[serde(default)]
    pub payload: RazorpayEventPayload,

    /// Unix timestamp when the event was created.
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RazorpayEventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<EntityWrapper<PaymentEntity>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<EntityWrapper<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

/// The payment object inside `payload.payment.entity`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentEntity {
    pub id: String,
    /// Amount in minor units.
    pub amount: u64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Event types we distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RazorpayEventType {
    PaymentCaptured,
    PaymentFailed,
    Unknown,
}

impl RazorpayEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "payment.captured" => Self::PaymentCaptured,
            "payment.failed" => Self::PaymentFailed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentCaptured => "payment.captured",
            Self::PaymentFailed => "payment.failed",
            Self::Unknown => "unknown",
        }
    }
}

impl RazorpayEvent {
    pub fn parsed_type(&self) -> RazorpayEventType {
        RazorpayEventType::parse(&self.event)
    }

    pub fn payment(&self) -> Option<&PaymentEntity> {
        self.payload.payment.as_ref().map(|w| &w.entity)
    }

    /// Key used to deduplicate deliveries.
    ///
    /// Prefers the delivery header `x-razorpay-event-id`; otherwise falls
    /// back to `{event}:{payment_id}`, which is stable across redeliveries.
    pub fn idempotency_key(&self, event_id_header: Option<&str>) -> String {
        match event_id_header.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let subject = self.payment().map(|p| p.id.as_str()).unwrap_or("none");
                format!("{}:{}", self.event, subject)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured() -> RazorpayEvent {
        serde_json::from_value(serde_json::json!({
            "entity": "event",
            "event": "payment.captured",
            "contains": ["payment"],
            "payload": {"payment": {"entity": {
                "id": "pay_1", "amount": 100, "currency": "INR",
                "status": "captured", "order_id": "order_1", "extra": true
            }}},
            "created_at": 1
        }))
        .unwrap()
    }

    #[test]
    fn parses_known_types() {
        assert_eq!(captured().parsed_type(), RazorpayEventType::PaymentCaptured);
        assert_eq!(RazorpayEventType::parse("refund.created"), RazorpayEventType::Unknown);
    }

    #[test]
    fn idempotency_key_prefers_header() {
        let event = captured();
        assert_eq!(event.idempotency_key(Some("evt_abc")), "evt_abc");
        assert_eq!(event.idempotency_key(Some("  ")), "payment.captured:pay_1");
        assert_eq!(event.idempotency_key(None), "payment.captured:pay_1");
    }

    #[test]
    fn event_without_payment_still_parses() {
        let event: RazorpayEvent =
            serde_json::from_str(r#"{"event":"order.paid","payload":{}}"#).unwrap();
        assert!(event.payment().is_none());
        assert_eq!(event.idempotency_key(None), "order.paid:none");
    }
}
