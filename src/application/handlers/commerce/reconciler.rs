//! Entitlement Reconciler - turns free requests and confirmed payments
//! into ledger grants.
//!
//! Every way of obtaining access ends here:
//!
//! - free course enrollment and free webinar registration
//! - client-side payment confirmation (`order_id|payment_id` signature)
//! - `payment.captured` webhooks
//!
//! The ledger grant is atomic and idempotent, so running the same
//! confirmation through both the client and the webhook grants once.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::commerce::{
    Entitlement, EntitlementGrant, EntitlementSource, GrantOutcome, PaymentEntity,
    PaymentOrder, PaymentSignatureVerifier, Product, WebhookError,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, OrderId, PaymentId, UserId,
};
use crate::ports::{CourseRepository, EntitlementLedger, OrderRepository, WebinarRepository};

/// Outcome of settling a paid order.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub order: PaymentOrder,
    pub outcome: GrantOutcome,
}

/// Client confirmation after Razorpay Checkout succeeds.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentCommand {
    pub user_id: UserId,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

pub struct EntitlementReconciler {
    courses: Arc<dyn CourseRepository>,
    webinars: Arc<dyn WebinarRepository>,
    orders: Arc<dyn OrderRepository>,
    ledger: Arc<dyn EntitlementLedger>,
    verifier: PaymentSignatureVerifier,
}

impl EntitlementReconciler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        webinars: Arc<dyn WebinarRepository>,
        orders: Arc<dyn OrderRepository>,
        ledger: Arc<dyn EntitlementLedger>,
        verifier: PaymentSignatureVerifier,
    ) -> Self {
        Self {
            courses,
            webinars,
            orders,
            ledger,
            verifier,
        }
    }

    /// Grants a free product. Eligibility is the caller's concern.
    pub async fn grant_free(
        &self,
        user_id: &UserId,
        product: Product,
        product_title: &str,
    ) -> Result<GrantOutcome, DomainError> {
        let grant = EntitlementGrant::new(
            Entitlement::new(user_id.clone(), product, EntitlementSource::Free),
            product_title,
        );
        let outcome = self.ledger.grant(grant).await?;
        if outcome.is_new() {
            info!(user_id = %user_id, product = %product, "free entitlement granted");
        }
        Ok(outcome)
    }

    /// Verifies the checkout signature and settles the caller's order.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` if the signature does not match (nothing changes)
    /// - `OrderNotFound` if the order is unknown
    /// - `Forbidden` if the order belongs to someone else
    pub async fn confirm_payment(
        &self,
        cmd: ConfirmPaymentCommand,
    ) -> Result<Settlement, DomainError> {
        if self
            .verifier
            .verify(&cmd.order_id, &cmd.payment_id, &cmd.signature)
            .is_err()
        {
            warn!(order_id = %cmd.order_id, user_id = %cmd.user_id, "payment signature rejected");
            return Err(DomainError::new(
                ErrorCode::InvalidSignature,
                "Payment signature verification failed",
            ));
        }

        let order_id = OrderId::new(cmd.order_id)?;
        let payment_id = PaymentId::new(cmd.payment_id)?;
        let order = self
            .orders
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::OrderNotFound, "Order", &order_id))?;
        order.check_owner(&cmd.user_id)?;

        self.settle(order, payment_id).await
    }

    /// Settles the order behind a captured payment.
    ///
    /// Events we can never resolve (no order id, unknown order, amount
    /// mismatch) are acknowledged as ignored so the gateway stops retrying.
    pub async fn settle_captured(
        &self,
        payment: &PaymentEntity,
    ) -> Result<Settlement, WebhookError> {
        let order = self.order_for_payment(payment).await?;

        if order.amount.amount() != payment.amount
            || !order.amount.currency().eq_ignore_ascii_case(&payment.currency)
        {
            warn!(
                order_id = %order.id,
                payment_id = %payment.id,
                expected = %order.amount,
                captured_amount = payment.amount,
                captured_currency = %payment.currency,
                "captured amount does not match order"
            );
            return Err(WebhookError::Ignored(format!(
                "Amount mismatch for order {}",
                order.id
            )));
        }

        let payment_id = PaymentId::new(payment.id.as_str())
            .map_err(|_| WebhookError::MissingField("payment.id"))?;
        Ok(self.settle(order, payment_id).await?)
    }

    /// Marks the order behind a failed payment as failed.
    pub async fn record_failure(&self, payment: &PaymentEntity) -> Result<(), WebhookError> {
        let mut order = self.order_for_payment(payment).await?;
        let reason = payment
            .error_description
            .clone()
            .unwrap_or_else(|| "Payment failed".to_string());
        order.mark_failed(reason)?;
        self.orders.update(&order).await?;

        info!(order_id = %order.id, payment_id = %payment.id, "order marked failed");
        Ok(())
    }

    async fn order_for_payment(&self, payment: &PaymentEntity) -> Result<PaymentOrder, WebhookError> {
        let Some(raw_order_id) = payment.order_id.as_deref() else {
            warn!(payment_id = %payment.id, "webhook payment has no order id");
            return Err(WebhookError::Ignored("Payment has no order id".to_string()));
        };
        let order_id =
            OrderId::new(raw_order_id).map_err(|_| WebhookError::MissingField("order_id"))?;
        match self.orders.find_by_id(&order_id).await? {
            Some(order) => Ok(order),
            None => {
                warn!(order_id = %order_id, payment_id = %payment.id, "webhook for unknown order");
                Err(WebhookError::Ignored(format!("Order {} not found", order_id)))
            }
        }
    }

    async fn settle(
        &self,
        mut order: PaymentOrder,
        payment_id: PaymentId,
    ) -> Result<Settlement, DomainError> {
        if !order.is_entitled() {
            order.mark_paid(payment_id.clone())?;
            self.orders.update(&order).await?;
        } else {
            // Re-confirmation; rejects a different payment id.
            order.mark_paid(payment_id.clone())?;
        }

        let title = self.product_title(&order.product).await?;
        let grant = EntitlementGrant::new(
            Entitlement::new(
                order.user_id.clone(),
                order.product,
                EntitlementSource::Order {
                    order_id: order.id.clone(),
                    payment_id: payment_id.clone(),
                },
            ),
            &title,
        );
        let outcome = self.ledger.grant(grant).await?;
        order.mark_entitled()?;

        if outcome.is_new() {
            info!(
                order_id = %order.id,
                payment_id = %payment_id,
                user_id = %order.user_id,
                product = %order.product,
                "paid entitlement granted"
            );
        }
        Ok(Settlement { order, outcome })
    }

    async fn product_title(&self, product: &Product) -> Result<String, DomainError> {
        match product {
            Product::Course(id) => self
                .courses
                .find_by_id(id)
                .await?
                .map(|c| c.title)
                .ok_or_else(|| DomainError::not_found(ErrorCode::CourseNotFound, "Course", id)),
            Product::Webinar(id) => self
                .webinars
                .find_by_id(id)
                .await?
                .map(|w| w.title)
                .ok_or_else(|| DomainError::not_found(ErrorCode::WebinarNotFound, "Webinar", id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::catalog::test_support::course_with_modules;
    use crate::domain::catalog::Course;
    use crate::domain::commerce::{sign_payment, OrderStatus};
    use crate::domain::foundation::Money;

    const KEY_SECRET: &str = "test_key_secret";

    fn buyer() -> UserId {
        UserId::new("buyer-1").unwrap()
    }

    fn reconciler(store: &Arc<InMemoryStore>) -> EntitlementReconciler {
        EntitlementReconciler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            PaymentSignatureVerifier::new(KEY_SECRET),
        )
    }

    async fn paid_course_with_order(store: &Arc<InMemoryStore>) -> (Course, PaymentOrder) {
        let mut course = course_with_modules(&[2]);
        course.price = Money::new(49_900, "INR").unwrap();
        course.publish().unwrap();
        CourseRepository::save(store.as_ref(), &course).await.unwrap();

        let order = PaymentOrder::initiate(
            OrderId::new("order_abc").unwrap(),
            buyer(),
            Product::Course(course.id),
            course.price.clone(),
            "rcpt_1",
        );
        OrderRepository::save(store.as_ref(), &order).await.unwrap();
        (course, order)
    }

    fn confirm(order_id: &str, payment_id: &str, signature: String) -> ConfirmPaymentCommand {
        ConfirmPaymentCommand {
            user_id: buyer(),
            order_id: order_id.to_string(),
            payment_id: payment_id.to_string(),
            signature,
        }
    }

    fn captured(order_id: &str, amount: u64) -> PaymentEntity {
        serde_json::from_value(serde_json::json!({
            "id": "pay_1",
            "amount": amount,
            "currency": "INR",
            "status": "captured",
            "order_id": order_id,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn confirmed_payment_enrolls_once() {
        let store = Arc::new(InMemoryStore::new());
        let (course, order) = paid_course_with_order(&store).await;
        let reconciler = reconciler(&store);
        let signature = sign_payment(KEY_SECRET, order.id.as_str(), "pay_1");

        let first = reconciler
            .confirm_payment(confirm("order_abc", "pay_1", signature.clone()))
            .await
            .unwrap();
        let again = reconciler
            .confirm_payment(confirm("order_abc", "pay_1", signature))
            .await
            .unwrap();

        assert_eq!(first.outcome, GrantOutcome::Granted);
        assert_eq!(again.outcome, GrantOutcome::AlreadyGranted);
        assert_eq!(again.order.status, OrderStatus::Entitled);
        let stored = CourseRepository::find_by_id(store.as_ref(), &course.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.enrolled_count, 1);
    }

    #[tokio::test]
    async fn bad_signature_changes_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let (_course, order) = paid_course_with_order(&store).await;

        let err = reconciler(&store)
            .confirm_payment(confirm("order_abc", "pay_1", "00".repeat(32)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidSignature);
        let stored = OrderRepository::find_by_id(store.as_ref(), &order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, OrderStatus::Initiated);
        assert_eq!(store.entitlement_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let signature = sign_payment(KEY_SECRET, "order_missing", "pay_1");
        let err = reconciler(&store)
            .confirm_payment(confirm("order_missing", "pay_1", signature))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn someone_elses_order_is_forbidden() {
        let store = Arc::new(InMemoryStore::new());
        paid_course_with_order(&store).await;
        let mut cmd = confirm(
            "order_abc",
            "pay_1",
            sign_payment(KEY_SECRET, "order_abc", "pay_1"),
        );
        cmd.user_id = UserId::new("intruder").unwrap();

        let err = reconciler(&store).confirm_payment(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn captured_amount_mismatch_is_ignored() {
        let store = Arc::new(InMemoryStore::new());
        paid_course_with_order(&store).await;

        let err = reconciler(&store)
            .settle_captured(&captured("order_abc", 100))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Ignored(_)));
        assert_eq!(store.entitlement_count().await, 0);
    }

    #[tokio::test]
    async fn captured_for_unknown_order_is_ignored() {
        let store = Arc::new(InMemoryStore::new());
        let err = reconciler(&store)
            .settle_captured(&captured("order_nope", 49_900))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Ignored(_)));
    }

    #[tokio::test]
    async fn failed_payment_marks_order_failed() {
        let store = Arc::new(InMemoryStore::new());
        let (_course, order) = paid_course_with_order(&store).await;

        reconciler(&store)
            .record_failure(&captured("order_abc", 49_900))
            .await
            .unwrap();

        let stored = OrderRepository::find_by_id(store.as_ref(), &order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, OrderStatus::Failed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_confirmation_and_webhook_grant_once() {
        let store = Arc::new(InMemoryStore::new());
        let (course, order) = paid_course_with_order(&store).await;
        let reconciler = Arc::new(reconciler(&store));
        let signature = sign_payment(KEY_SECRET, order.id.as_str(), "pay_1");

        let client = {
            let reconciler = reconciler.clone();
            tokio::spawn(async move {
                reconciler
                    .confirm_payment(confirm("order_abc", "pay_1", signature))
                    .await
                    .map(|s| s.outcome)
            })
        };
        let webhook = {
            let reconciler = reconciler.clone();
            tokio::spawn(async move {
                reconciler
                    .settle_captured(&captured("order_abc", 49_900))
                    .await
                    .map(|s| s.outcome)
            })
        };
        let (client, webhook) = tokio::join!(client, webhook);
        let outcomes = [client.unwrap().unwrap(), webhook.unwrap().unwrap()];

        assert_eq!(
            outcomes.iter().filter(|o| **o == GrantOutcome::Granted).count(),
            1
        );
        assert_eq!(store.entitlement_count().await, 1);
        assert_eq!(store.progress_count().await, 1);
        let stored = CourseRepository::find_by_id(store.as_ref(), &course.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.enrolled_count, 1);
        let stored_order = OrderRepository::find_by_id(store.as_ref(), &order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored_order.status, OrderStatus::Entitled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_free_grants_count_one_enrollment() {
        let store = Arc::new(InMemoryStore::new());
        let mut course = course_with_modules(&[1]);
        course.publish().unwrap();
        CourseRepository::save(store.as_ref(), &course).await.unwrap();
        let reconciler = Arc::new(reconciler(&store));
        let product = Product::Course(course.id);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let reconciler = reconciler.clone();
                tokio::spawn(async move {
                    reconciler
                        .grant_free(&buyer(), product, "Test Course")
                        .await
                })
            })
            .collect();
        let mut granted = 0;
        for task in tasks {
            if task.await.unwrap().unwrap().is_new() {
                granted += 1;
            }
        }

        assert_eq!(granted, 1);
        assert_eq!(store.entitlement_count().await, 1);
        assert_eq!(store.progress_count().await, 1);
        let stored = CourseRepository::find_by_id(store.as_ref(), &course.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.enrolled_count, 1);
    }
}
