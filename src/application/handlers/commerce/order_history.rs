//! The caller's own payment orders, newest first.

use std::sync::Arc;

use crate::domain::commerce::PaymentOrder;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::OrderRepository;

pub struct ListUserOrdersHandler {
    orders: Arc<dyn OrderRepository>,
}

impl ListUserOrdersHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn handle(&self, user_id: &UserId) -> Result<Vec<PaymentOrder>, DomainError> {
        self.orders.list_for_user(user_id).await
    }
}
