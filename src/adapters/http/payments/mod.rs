//! HTTP adapter for payments.
//!
//! - `POST /api/payments/orders` - open a gateway order for a paid product
//! - `POST /api/payments/verify` - client-side confirmation after checkout
//! - `POST /api/webhooks/razorpay` - gateway callbacks (signature verified, no auth)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{payment_routes, webhook_routes};
