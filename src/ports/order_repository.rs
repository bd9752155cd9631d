//! Payment order repository port.

use async_trait::async_trait;

use crate::domain::commerce::PaymentOrder;
use crate::domain::foundation::{DomainError, OrderId, UserId};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// # Errors
    ///
    /// - `AlreadyExists` if the gateway order id is already stored
    async fn save(&self, order: &PaymentOrder) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `OrderNotFound` if the order does not exist
    async fn update(&self, order: &PaymentOrder) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<PaymentOrder>, DomainError>;

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<PaymentOrder>, DomainError>;

    /// Most recent orders first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<PaymentOrder>, DomainError>;
}
