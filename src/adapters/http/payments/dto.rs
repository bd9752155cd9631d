//! HTTP DTOs for payment endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::commerce::{OrderStatus, PaymentOrder, Product, ProductKind};
use crate::domain::foundation::{CourseId, WebinarId};

use crate::adapters::http::catalog::dto::rfc3339;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to open an order. The amount always comes from the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub product_kind: ProductKind,
    pub product_id: Uuid,
}

impl CreateOrderRequest {
    pub fn product(&self) -> Product {
        match self.product_kind {
            ProductKind::Course => Product::Course(CourseId::from_uuid(self.product_id)),
            ProductKind::Webinar => Product::Webinar(WebinarId::from_uuid(self.product_id)),
        }
    }
}

/// Fields returned by Razorpay Checkout on success.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// What the checkout widget needs.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    pub key_id: String,
    pub receipt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub product: Product,
    /// False when the entitlement already existed.
    pub newly_granted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Order row for the admin listing and the buyer's history.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub product: Product,
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub status: OrderStatus,
    pub payment_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&PaymentOrder> for OrderResponse {
    fn from(order: &PaymentOrder) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            product: order.product,
            amount: order.amount.amount(),
            currency: order.amount.currency().to_string(),
            receipt: order.receipt.clone(),
            status: order.status,
            payment_id: order.payment_id.as_ref().map(|p| p.to_string()),
            failure_reason: order.failure_reason.clone(),
            created_at: rfc3339(&order.created_at),
            updated_at: rfc3339(&order.updated_at),
        }
    }
}
