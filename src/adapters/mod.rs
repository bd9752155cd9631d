//! Adapters - implementations of port interfaces.
//!
//! - `auth` - JWT session validation (plus a mock for tests)
//! - `http` - axum REST API
//! - `memory` - in-memory repositories for tests and local runs
//! - `postgres` - sqlx repositories
//! - `razorpay` - payment gateway client

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod razorpay;

pub use auth::{JwtConfig, JwtSessionValidator, MockSessionValidator};
pub use memory::InMemoryStore;
pub use razorpay::{MockPaymentGateway, RazorpayClient, RazorpayConfig};
