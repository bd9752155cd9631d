//! CreatePaymentOrderHandler - opens a gateway order for a paid product.
//!
//! The amount always comes from the catalog, never from the client.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::commerce::{PaymentOrder, Product};
use crate::domain::foundation::{DomainError, ErrorCode, Money, UserId};
use crate::ports::{
    CourseRepository, CreateGatewayOrder, EntitlementLedger, OrderRepository, PaymentGateway,
    WebinarRepository,
};

#[derive(Debug, Clone)]
pub struct CreatePaymentOrderCommand {
    pub user_id: UserId,
    pub product: Product,
}

/// What the checkout widget needs.
#[derive(Debug, Clone)]
pub struct CreatePaymentOrderResult {
    pub order: PaymentOrder,
    pub key_id: String,
}

pub struct CreatePaymentOrderHandler {
    courses: Arc<dyn CourseRepository>,
    webinars: Arc<dyn WebinarRepository>,
    orders: Arc<dyn OrderRepository>,
    ledger: Arc<dyn EntitlementLedger>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CreatePaymentOrderHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        webinars: Arc<dyn WebinarRepository>,
        orders: Arc<dyn OrderRepository>,
        ledger: Arc<dyn EntitlementLedger>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            courses,
            webinars,
            orders,
            ledger,
            gateway,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentOrderCommand,
    ) -> Result<CreatePaymentOrderResult, DomainError> {
        let price = self.purchasable_price(&cmd.product).await?;
        if price.is_free() {
            return Err(DomainError::validation(
                "product_id",
                "Free products do not need a payment order",
            ));
        }
        if self.ledger.find(&cmd.user_id, &cmd.product).await?.is_some() {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                "You already have access to this product",
            ));
        }

        let receipt = receipt_for(&cmd.product);
        let mut notes = HashMap::new();
        notes.insert("user_id".to_string(), cmd.user_id.to_string());
        notes.insert("product".to_string(), cmd.product.to_string());

        let gateway_order = self
            .gateway
            .create_order(CreateGatewayOrder {
                amount: price.clone(),
                receipt: receipt.clone(),
                notes,
            })
            .await?;

        let order = PaymentOrder::initiate(
            gateway_order.id,
            cmd.user_id,
            cmd.product,
            price,
            receipt,
        );
        self.orders.save(&order).await?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            product = %order.product,
            amount = %order.amount,
            "payment order created"
        );
        Ok(CreatePaymentOrderResult {
            order,
            key_id: self.gateway.key_id().to_string(),
        })
    }

    async fn purchasable_price(&self, product: &Product) -> Result<Money, DomainError> {
        match product {
            Product::Course(id) => {
                let course = self
                    .courses
                    .find_by_id(id)
                    .await?
                    .filter(|c| c.is_published())
                    .ok_or_else(|| DomainError::not_found(ErrorCode::CourseNotFound, "Course", id))?;
                Ok(course.price)
            }
            Product::Webinar(id) => {
                let webinar = self.webinars.find_by_id(id).await?.ok_or_else(|| {
                    DomainError::not_found(ErrorCode::WebinarNotFound, "Webinar", id)
                })?;
                webinar.check_open_for_registration()?;
                Ok(webinar.price)
            }
        }
    }
}

/// Razorpay caps receipts at 40 characters.
fn receipt_for(product: &Product) -> String {
    let id = product.id_string().replace('-', "");
    let stamp = chrono::Utc::now().timestamp();
    let mut receipt = format!("{}_{}_{}", &product.kind().as_str()[..1], stamp, id);
    receipt.truncate(40);
    receipt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::razorpay::MockPaymentGateway;
    use crate::domain::catalog::test_support::course_with_modules;
    use crate::domain::commerce::OrderStatus;
    use crate::domain::foundation::CourseId;

    fn handler(store: &Arc<InMemoryStore>, gateway: Arc<MockPaymentGateway>) -> CreatePaymentOrderHandler {
        CreatePaymentOrderHandler::new(store.clone(), store.clone(), store.clone(), store.clone(), gateway)
    }

    async fn paid_course(store: &Arc<InMemoryStore>) -> CourseId {
        let mut course = course_with_modules(&[1]);
        course.price = Money::new(149_900, "INR").unwrap();
        course.publish().unwrap();
        CourseRepository::save(store.as_ref(), &course).await.unwrap();
        course.id
    }

    #[tokio::test]
    async fn order_uses_catalog_price() {
        let store = Arc::new(InMemoryStore::new());
        let course_id = paid_course(&store).await;
        let gateway = Arc::new(MockPaymentGateway::new());

        let result = handler(&store, gateway.clone())
            .handle(CreatePaymentOrderCommand {
                user_id: UserId::new("buyer").unwrap(),
                product: Product::Course(course_id),
            })
            .await
            .unwrap();

        assert_eq!(result.order.amount.amount(), 149_900);
        assert_eq!(result.order.status, OrderStatus::Initiated);
        assert_eq!(result.key_id, MockPaymentGateway::KEY_ID);
        assert_eq!(gateway.created_orders().len(), 1);
        assert!(result.order.receipt.len() <= 40);
    }

    #[tokio::test]
    async fn free_product_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let mut course = course_with_modules(&[1]);
        course.publish().unwrap();
        CourseRepository::save(store.as_ref(), &course).await.unwrap();

        let err = handler(&store, Arc::new(MockPaymentGateway::new()))
            .handle(CreatePaymentOrderCommand {
                user_id: UserId::new("buyer").unwrap(),
                product: Product::Course(course.id),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn gateway_failure_surfaces_as_gateway_error() {
        let store = Arc::new(InMemoryStore::new());
        let course_id = paid_course(&store).await;

        let err = handler(&store, Arc::new(MockPaymentGateway::failing()))
            .handle(CreatePaymentOrderCommand {
                user_id: UserId::new("buyer").unwrap(),
                product: Product::Course(course_id),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentGatewayError);
    }
}
