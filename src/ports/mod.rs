//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `CourseRepository`, `WebinarRepository` - catalog aggregates
//! - `ProgressRepository` - one learning progress record per (user, course)
//! - `OrderRepository` - gateway payment orders
//! - `EntitlementLedger` - atomic, exactly-once access grants
//! - `NotificationRepository`, `ContentRepository`, `UserRepository`
//! - `AnalyticsReader` - admin aggregates
//!
//! ## Webhook Ports
//!
//! - `WebhookEventRepository` - Razorpay webhook idempotency tracking
//!
//! ## External Services
//!
//! - `PaymentGateway` - order creation with the payment gateway
//! - `SessionValidator` - bearer token validation

mod analytics_reader;
mod content_repository;
mod course_repository;
mod entitlement_ledger;
mod notification_repository;
mod order_repository;
mod payment_gateway;
mod progress_repository;
mod session_validator;
mod user_repository;
mod webhook_event_repository;
mod webinar_repository;

pub use analytics_reader::{AnalyticsReader, PlatformStats};
pub use content_repository::ContentRepository;
pub use course_repository::{CourseFilter, CourseRepository};
pub use entitlement_ledger::EntitlementLedger;
pub use notification_repository::NotificationRepository;
pub use order_repository::OrderRepository;
pub use payment_gateway::{
    CreateGatewayOrder, GatewayOrder, PaymentError, PaymentErrorCode, PaymentGateway,
};
pub use progress_repository::ProgressRepository;
pub use session_validator::SessionValidator;
pub use user_repository::{Page, UserRepository};
pub use webhook_event_repository::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookRecordStatus, WebhookResult,
};
pub use webinar_repository::WebinarRepository;
