use async_trait::async_trait;

use crate::domain::commerce::{Entitlement, EntitlementGrant, GrantOutcome, PaymentOrder, Product};
use crate::domain::foundation::{DomainError, ErrorCode, OrderId, UserId};
use crate::domain::learning::LearningProgress;
use crate::ports::{
    EntitlementLedger, OrderRepository, SaveResult, WebhookEventRecord, WebhookEventRepository,
};

use super::InMemoryStore;

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn save(&self, order: &PaymentOrder) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        if state.orders.contains_key(&order.id) {
            return Err(DomainError::new(ErrorCode::AlreadyExists, "Order already exists")
                .with_detail("order_id", order.id.to_string()));
        }
        state.orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn update(&self, order: &PaymentOrder) -> Result<(), DomainError> {
        let mut state = self.lock().await;
        let stored = state
            .orders
            .get_mut(&order.id)
            .ok_or_else(|| DomainError::not_found(ErrorCode::OrderNotFound, "Order", &order.id))?;
        *stored = order.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<PaymentOrder>, DomainError> {
        Ok(self.lock().await.orders.get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<PaymentOrder>, DomainError> {
        let mut orders: Vec<PaymentOrder> = self
            .lock()
            .await
            .orders
            .values()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<PaymentOrder>, DomainError> {
        let mut orders: Vec<PaymentOrder> = self.lock().await.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit as usize);
        Ok(orders)
    }
}

#[async_trait]
impl EntitlementLedger for InMemoryStore {
    async fn grant(&self, grant: EntitlementGrant) -> Result<GrantOutcome, DomainError> {
        let mut guard = self.lock().await;
        let state = &mut *guard;

        // Validate everything before the first mutation.
        let settled_order = match grant.order_id() {
            Some(order_id) => {
                let mut order = state.orders.get(order_id).cloned().ok_or_else(|| {
                    DomainError::not_found(ErrorCode::OrderNotFound, "Order", order_id)
                })?;
                order.mark_entitled()?;
                Some(order)
            }
            None => None,
        };

        let EntitlementGrant {
            entitlement,
            notification,
        } = grant;
        let key = (entitlement.user_id.clone(), entitlement.product);

        if state.entitlements.contains_key(&key) {
            if let Some(order) = settled_order {
                state.orders.insert(order.id.clone(), order);
            }
            return Ok(GrantOutcome::AlreadyGranted);
        }

        match entitlement.product {
            Product::Course(course_id) => {
                let course = state.courses.get_mut(&course_id).ok_or_else(|| {
                    DomainError::not_found(ErrorCode::CourseNotFound, "Course", course_id)
                })?;
                course.record_enrollment();
                state
                    .progress
                    .entry((entitlement.user_id.clone(), course_id))
                    .or_insert_with(|| {
                        LearningProgress::start(entitlement.user_id.clone(), course_id)
                    });
            }
            Product::Webinar(webinar_id) => {
                let webinar = state.webinars.get_mut(&webinar_id).ok_or_else(|| {
                    DomainError::not_found(ErrorCode::WebinarNotFound, "Webinar", webinar_id)
                })?;
                webinar.check_open_for_registration()?;
                webinar.record_registration();
            }
        }

        if let Some(order) = settled_order {
            state.orders.insert(order.id.clone(), order);
        }
        state.notifications.push(notification);
        state.entitlements.insert(key, entitlement);
        Ok(GrantOutcome::Granted)
    }

    async fn find(
        &self,
        user_id: &UserId,
        product: &Product,
    ) -> Result<Option<Entitlement>, DomainError> {
        Ok(self
            .lock()
            .await
            .entitlements
            .get(&(user_id.clone(), *product))
            .cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Entitlement>, DomainError> {
        let mut entitlements: Vec<Entitlement> = self
            .lock()
            .await
            .entitlements
            .values()
            .filter(|e| &e.user_id == user_id)
            .cloned()
            .collect();
        entitlements.sort_by(|a, b| a.granted_at.cmp(&b.granted_at));
        Ok(entitlements)
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryStore {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError> {
        Ok(self.lock().await.webhook_events.get(event_id).cloned())
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        let mut state = self.lock().await;
        if state.webhook_events.contains_key(&record.event_id) {
            return Ok(SaveResult::AlreadyExists);
        }
        state.webhook_events.insert(record.event_id.clone(), record);
        Ok(SaveResult::Inserted)
    }
}
