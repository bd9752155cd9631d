//! Commerce domain - products, payment orders, entitlements and the
//! Razorpay callback vocabulary.

mod entitlement;
mod order;
mod product;
mod razorpay_event;
mod signature;
mod webhook_errors;
mod webhook_processor;

pub use entitlement::{Entitlement, EntitlementGrant, EntitlementSource, GrantOutcome};
pub use order::{OrderStatus, PaymentOrder};
pub use product::{Product, ProductKind};
pub use razorpay_event::{
    EntityWrapper, PaymentEntity, RazorpayEvent, RazorpayEventPayload, RazorpayEventType,
};
pub use signature::{sign_hex, sign_payment, PaymentSignatureVerifier, WebhookSignatureVerifier};
pub use webhook_errors::WebhookError;
pub use webhook_processor::{
    HandlerRegistry, IdempotentWebhookProcessor, WebhookDispatcher, WebhookEventHandler,
};
