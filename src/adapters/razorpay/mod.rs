//! Razorpay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port:
//! - Order creation through the Orders API
//! - A mock gateway for tests and local development
//!
//! Signature checks for checkout confirmations and webhooks live in the
//! commerce domain; this adapter only talks to the API.
//!
//! # Configuration
//!
//! - `MARKET_ACADEMY__PAYMENT__RAZORPAY_KEY_ID`
//! - `MARKET_ACADEMY__PAYMENT__RAZORPAY_KEY_SECRET`
//! - `MARKET_ACADEMY__PAYMENT__RAZORPAY_WEBHOOK_SECRET`

mod client;
mod mock;

pub use client::{RazorpayClient, RazorpayConfig};
pub use mock::MockPaymentGateway;
