//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! Aggregates are stored as JSONB documents beside the scalar columns used
//! for lookups and uniqueness. The schema lives in `migrations/`.
//!
//! - `PostgresCourseRepository` / `PostgresWebinarRepository` - catalog
//! - `PostgresProgressRepository` - versioned progress records
//! - `PostgresEntitlementLedger` - transactional grants
//! - `PostgresOrderRepository` / `PostgresWebhookEventRepository` - payments
//! - `PostgresUserRepository` / `PostgresNotificationRepository` /
//!   `PostgresContentRepository` - accounts and editorial content
//! - `PostgresAnalyticsReader` - admin statistics

mod accounts_repository;
mod analytics_reader;
mod catalog_repository;
mod commerce_repository;
mod progress_repository;
mod support;

pub use accounts_repository::{
    PostgresContentRepository, PostgresNotificationRepository, PostgresUserRepository,
};
pub use analytics_reader::PostgresAnalyticsReader;
pub use catalog_repository::{PostgresCourseRepository, PostgresWebinarRepository};
pub use commerce_repository::{
    PostgresEntitlementLedger, PostgresOrderRepository, PostgresWebhookEventRepository,
};
pub use progress_repository::PostgresProgressRepository;
