//! Webhook processor - idempotent handling of Razorpay deliveries.
//!
//! 1. Skip deliveries whose idempotency key was already recorded
//! 2. Dispatch to the handler for the event type
//! 3. Record the outcome (success, ignored or failed)
//!
//! Concurrent duplicate deliveries race on the record insert; the loser
//! reports `AlreadyProcessed`. Retryable failures are not recorded so the
//! gateway's redelivery gets a second chance.

use async_trait::async_trait;

use crate::domain::commerce::{RazorpayEvent, RazorpayEventType, WebhookError};
use crate::ports::{SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookResult};

/// Handler for one kind of Razorpay event.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    fn handles(&self) -> RazorpayEventType;

    /// `Err(WebhookError::Ignored(_))` acknowledges without acting.
    async fn handle(&self, event: &RazorpayEvent) -> Result<(), WebhookError>;
}

/// Routes events to handlers.
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    fn get_handler(&self, event_type: RazorpayEventType) -> Option<&dyn WebhookEventHandler>;

    async fn dispatch(&self, event: &RazorpayEvent) -> Result<(), WebhookError> {
        match self.get_handler(event.parsed_type()) {
            Some(handler) => handler.handle(event).await,
            None => Err(WebhookError::Ignored(format!(
                "No handler for event type: {}",
                event.event
            ))),
        }
    }
}

/// Dispatcher over a fixed list of handlers.
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn WebhookEventHandler>>,
}

impl HandlerRegistry {
    pub fn new(handlers: Vec<Box<dyn WebhookEventHandler>>) -> Self {
        Self { handlers }
    }
}

impl WebhookDispatcher for HandlerRegistry {
    fn get_handler(&self, event_type: RazorpayEventType) -> Option<&dyn WebhookEventHandler> {
        self.handlers
            .iter()
            .find(|h| h.handles() == event_type)
            .map(|h| h.as_ref())
    }
}

pub struct IdempotentWebhookProcessor<R: WebhookEventRepository, D: WebhookDispatcher> {
    repository: R,
    dispatcher: D,
}

impl<R: WebhookEventRepository, D: WebhookDispatcher> IdempotentWebhookProcessor<R, D> {
    pub fn new(repository: R, dispatcher: D) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Processes a verified event at most once per `event_key`.
    pub async fn process(
        &self,
        event_key: &str,
        event: &RazorpayEvent,
        payload: serde_json::Value,
    ) -> Result<WebhookResult, WebhookError> {
        if self.repository.find_by_event_id(event_key).await?.is_some() {
            return Ok(WebhookResult::AlreadyProcessed);
        }

        let result = match self.dispatcher.dispatch(event).await {
            Err(e) if e.is_retryable() => {
                tracing::warn!(event_key, error = %e, "webhook failed, leaving unrecorded for retry");
                return Err(e);
            }
            other => other,
        };

        let record = match &result {
            Ok(()) => WebhookEventRecord::success(event_key, &event.event, payload),
            Err(WebhookError::Ignored(reason)) => {
                WebhookEventRecord::ignored(event_key, &event.event, reason, payload)
            }
            Err(e) => WebhookEventRecord::failed(event_key, &event.event, e.to_string(), payload),
        };

        match self.repository.save(record).await? {
            SaveResult::Inserted => match result {
                Ok(()) => Ok(WebhookResult::Processed),
                Err(WebhookError::Ignored(reason)) => Ok(WebhookResult::Ignored(reason)),
                Err(e) => Err(e),
            },
            SaveResult::AlreadyExists => Ok(WebhookResult::AlreadyProcessed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    #[derive(Clone, Default)]
    struct MockWebhookRepository {
        records: Arc<RwLock<HashMap<String, WebhookEventRecord>>>,
    }

    #[async_trait]
    impl WebhookEventRepository for MockWebhookRepository {
        async fn find_by_event_id(
            &self,
            event_id: &str,
        ) -> Result<Option<WebhookEventRecord>, DomainError> {
            Ok(self.records.read().await.get(event_id).cloned())
        }

        async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
            let mut records = self.records.write().await;
            if records.contains_key(&record.event_id) {
                Ok(SaveResult::AlreadyExists)
            } else {
                records.insert(record.event_id.clone(), record);
                Ok(SaveResult::Inserted)
            }
        }
    }

    enum Behaviour {
        Succeed,
        Ignore,
        FailPermanently,
        FailTransiently,
    }

    struct CountingHandler {
        calls: Arc<AtomicU32>,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl WebhookEventHandler for CountingHandler {
        fn handles(&self) -> RazorpayEventType {
            RazorpayEventType::PaymentCaptured
        }

        async fn handle(&self, _event: &RazorpayEvent) -> Result<(), WebhookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Succeed => Ok(()),
                Behaviour::Ignore => Err(WebhookError::Ignored("amount mismatch".to_string())),
                Behaviour::FailPermanently => {
                    Err(WebhookError::InvalidTransition("entitled -> paid".to_string()))
                }
                Behaviour::FailTransiently => Err(WebhookError::Database("timeout".to_string())),
            }
        }
    }

    fn processor(
        behaviour: Behaviour,
    ) -> (
        IdempotentWebhookProcessor<MockWebhookRepository, HandlerRegistry>,
        MockWebhookRepository,
        Arc<AtomicU32>,
    ) {
        let repo = MockWebhookRepository::default();
        let calls = Arc::new(AtomicU32::new(0));
        let registry = HandlerRegistry::new(vec![Box::new(CountingHandler {
            calls: calls.clone(),
            behaviour,
        })]);
        (IdempotentWebhookProcessor::new(repo.clone(), registry), repo, calls)
    }

    fn event(name: &str) -> RazorpayEvent {
        serde_json::from_value(serde_json::json!({"event": name, "payload": {}})).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn processes_new_event_once() {
        let (processor, repo, calls) = processor(Behaviour::Succeed);
        let e = event("payment.captured");

        let first = processor.process("evt_1", &e, serde_json::json!({})).await.unwrap();
        let second = processor.process("evt_1", &e, serde_json::json!({})).await.unwrap();

        assert_eq!(first, WebhookResult::Processed);
        assert_eq!(second, WebhookResult::AlreadyProcessed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.records.read().await["evt_1"].result.as_str(), "success");
    }

    #[tokio::test]
    async fn unknown_event_type_is_recorded_as_ignored() {
        let (processor, repo, calls) = processor(Behaviour::Succeed);

        let result = processor
            .process("evt_2", &event("refund.created"), serde_json::json!({}))
            .await
            .unwrap();

        assert!(matches!(result, WebhookResult::Ignored(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(repo.records.read().await["evt_2"].result.as_str(), "ignored");
    }

    #[tokio::test]
    async fn handler_ignore_is_acknowledged() {
        let (processor, _repo, _) = processor(Behaviour::Ignore);
        let result = processor
            .process("evt_3", &event("payment.captured"), serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(result, WebhookResult::Ignored("amount mismatch".to_string()));
    }

    #[tokio::test]
    async fn permanent_failure_is_recorded_and_not_retried() {
        let (processor, repo, calls) = processor(Behaviour::FailPermanently);
        let e = event("payment.captured");

        assert!(processor.process("evt_4", &e, serde_json::json!({})).await.is_err());
        let again = processor.process("evt_4", &e, serde_json::json!({})).await.unwrap();

        assert_eq!(again, WebhookResult::AlreadyProcessed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.records.read().await["evt_4"].result.as_str(), "failed");
    }

    #[tokio::test]
    async fn transient_failure_stays_unrecorded_for_redelivery() {
        let (processor, repo, calls) = processor(Behaviour::FailTransiently);
        let e = event("payment.captured");

        let err = processor.process("evt_5", &e, serde_json::json!({})).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(repo.records.read().await.get("evt_5").is_none());

        let _ = processor.process("evt_5", &e, serde_json::json!({})).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
