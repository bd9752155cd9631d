//! Axum routers for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{create_order, list_my_orders, razorpay_webhook, verify_payment};

/// Authenticated payment routes, relative to `/api/payments`.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_my_orders).post(create_order))
        .route("/verify", post(verify_payment))
}

/// Gateway callbacks, relative to `/api/webhooks`.
///
/// Separate from the payment routes because webhooks carry no user token;
/// they are verified by signature.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/razorpay", post(razorpay_webhook))
}
