//! Commerce handlers.
//!
//! ## Commands
//! - Free course enrollment and webinar registration
//! - Creating payment orders with the gateway
//! - Listing a buyer's order history
//! - Confirming payments from the client
//! - Processing Razorpay webhooks
//!
//! All grants go through `EntitlementReconciler`.

mod create_payment_order;
mod enroll;
mod order_history;
mod razorpay_webhook;
mod reconciler;

pub use create_payment_order::{
    CreatePaymentOrderCommand, CreatePaymentOrderHandler, CreatePaymentOrderResult,
};
pub use enroll::{
    EnrollInCourseCommand, EnrollInCourseHandler, EnrollmentResult, RegisterForWebinarCommand,
    RegisterForWebinarHandler, RegistrationResult,
};
pub use order_history::ListUserOrdersHandler;
pub use razorpay_webhook::{
    HandleRazorpayWebhookCommand, HandleRazorpayWebhookHandler, PaymentCapturedHandler,
    PaymentFailedHandler,
};
pub use reconciler::{ConfirmPaymentCommand, EntitlementReconciler, Settlement};
