use std::sync::Arc;

use crate::domain::commerce::PaymentOrder;
use crate::domain::foundation::DomainError;
use crate::ports::OrderRepository;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

#[derive(Debug, Clone, Default)]
pub struct ListRecentOrdersQuery {
    pub limit: Option<u32>,
}

pub struct ListRecentOrdersHandler {
    orders: Arc<dyn OrderRepository>,
}

impl ListRecentOrdersHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn handle(&self, query: ListRecentOrdersQuery) -> Result<Vec<PaymentOrder>, DomainError> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        self.orders.list_recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::commerce::Product;
    use crate::domain::foundation::{CourseId, Money, OrderId, UserId};

    #[tokio::test]
    async fn limit_is_applied() {
        let store = Arc::new(InMemoryStore::new());
        for i in 0..3 {
            let order = PaymentOrder::initiate(
                OrderId::new(format!("order_{}", i)).unwrap(),
                UserId::new("buyer").unwrap(),
                Product::Course(CourseId::new()),
                Money::new(1_000, "INR").unwrap(),
                format!("r{}", i),
            );
            OrderRepository::save(store.as_ref(), &order).await.unwrap();
        }

        let orders = ListRecentOrdersHandler::new(store)
            .handle(ListRecentOrdersQuery { limit: Some(2) })
            .await
            .unwrap();
        assert_eq!(orders.len(), 2);
    }
}
