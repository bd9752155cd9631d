//! HandleRazorpayWebhookHandler - verifies, deduplicates and dispatches
//! Razorpay webhook deliveries.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::commerce::{
    HandlerRegistry, IdempotentWebhookProcessor, RazorpayEvent, RazorpayEventType, WebhookError,
    WebhookEventHandler, WebhookSignatureVerifier,
};
use crate::ports::{WebhookEventRepository, WebhookResult};

use super::EntitlementReconciler;

/// Grants access for `payment.captured`.
pub struct PaymentCapturedHandler {
    reconciler: Arc<EntitlementReconciler>,
}

impl PaymentCapturedHandler {
    pub fn new(reconciler: Arc<EntitlementReconciler>) -> Self {
        Self { reconciler }
    }
}

#[async_trait]
impl WebhookEventHandler for PaymentCapturedHandler {
    fn handles(&self) -> RazorpayEventType {
        RazorpayEventType::PaymentCaptured
    }

    async fn handle(&self, event: &RazorpayEvent) -> Result<(), WebhookError> {
        let payment = event
            .payment()
            .ok_or_else(|| WebhookError::Ignored("event carries no payment entity".to_string()))?;
        self.reconciler.settle_captured(payment).await?;
        Ok(())
    }
}

/// Marks the order failed for `payment.failed`.
pub struct PaymentFailedHandler {
    reconciler: Arc<EntitlementReconciler>,
}

impl PaymentFailedHandler {
    pub fn new(reconciler: Arc<EntitlementReconciler>) -> Self {
        Self { reconciler }
    }
}

#[async_trait]
impl WebhookEventHandler for PaymentFailedHandler {
    fn handles(&self) -> RazorpayEventType {
        RazorpayEventType::PaymentFailed
    }

    async fn handle(&self, event: &RazorpayEvent) -> Result<(), WebhookError> {
        let payment = event
            .payment()
            .ok_or_else(|| WebhookError::Ignored("event carries no payment entity".to_string()))?;
        self.reconciler.record_failure(payment).await
    }
}

/// Raw webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleRazorpayWebhookCommand {
    pub payload: Vec<u8>,
    /// `x-razorpay-signature`
    pub signature: Option<String>,
    /// `x-razorpay-event-id`
    pub event_id: Option<String>,
}

pub struct HandleRazorpayWebhookHandler {
    verifier: WebhookSignatureVerifier,
    processor: IdempotentWebhookProcessor<Arc<dyn WebhookEventRepository>, HandlerRegistry>,
}

impl HandleRazorpayWebhookHandler {
    pub fn new(
        verifier: WebhookSignatureVerifier,
        events: Arc<dyn WebhookEventRepository>,
        reconciler: Arc<EntitlementReconciler>,
    ) -> Self {
        let registry = HandlerRegistry::new(vec![
            Box::new(PaymentCapturedHandler::new(reconciler.clone())),
            Box::new(PaymentFailedHandler::new(reconciler)),
        ]);
        Self {
            verifier,
            processor: IdempotentWebhookProcessor::new(events, registry),
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleRazorpayWebhookCommand,
    ) -> Result<WebhookResult, WebhookError> {
        let Some(signature) = cmd.signature.as_deref() else {
            warn!("webhook delivery without signature header");
            return Err(WebhookError::InvalidSignature);
        };
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, signature)
            .map_err(|e| {
                if matches!(e, WebhookError::InvalidSignature) {
                    warn!("webhook signature rejected");
                }
                e
            })?;
        let payload: serde_json::Value = serde_json::from_slice(&cmd.payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let key = event.idempotency_key(cmd.event_id.as_deref());
        let result = self.processor.process(&key, &event, payload).await?;
        if let WebhookResult::Ignored(reason) = &result {
            warn!(event_key = %key, event = %event.event, reason = %reason, "webhook ignored");
        }
        Ok(result)
    }
}
