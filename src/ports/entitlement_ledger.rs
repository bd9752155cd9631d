//! Entitlement ledger port - the single source of truth for access.
//!
//! `grant` is the only way access is ever given, and it is atomic:
//!
//! 1. insert the (user, product) entitlement, or detect it already exists
//! 2. on a new entitlement: increment the product counter, create the
//!    learning progress record (courses) and store the notification
//! 3. move the paying order, if any, to `entitled`
//!
//! All of it commits together or not at all. A repeated grant returns
//! `AlreadyGranted` and leaves counters untouched.

use async_trait::async_trait;

use crate::domain::commerce::{Entitlement, EntitlementGrant, GrantOutcome, Product};
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait EntitlementLedger: Send + Sync {
    /// # Errors
    ///
    /// - `CourseNotFound` / `WebinarNotFound` if the product is gone
    /// - `CapacityReached` if a webinar filled up concurrently
    /// - `DatabaseError` on persistence failure (nothing committed)
    async fn grant(&self, grant: EntitlementGrant) -> Result<GrantOutcome, DomainError>;

    async fn find(
        &self,
        user_id: &UserId,
        product: &Product,
    ) -> Result<Option<Entitlement>, DomainError>;

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Entitlement>, DomainError>;
}
