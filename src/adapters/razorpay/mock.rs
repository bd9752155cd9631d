//! Mock payment gateway for tests and local development.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::OrderId;
use crate::ports::{CreateGatewayOrder, GatewayOrder, PaymentError, PaymentGateway};

/// Gateway that hands out sequential `order_mock_N` ids.
#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    created: Vec<CreateGatewayOrder>,
    next_error: Option<PaymentError>,
    fail_always: bool,
}

impl MockPaymentGateway {
    pub const KEY_ID: &'static str = "rzp_test_mock";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every call with a provider error.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().fail_always = true;
        mock
    }

    /// Fails only the next call.
    pub fn set_next_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Requests received so far.
    pub fn created_orders(&self) -> Vec<CreateGatewayOrder> {
        self.inner.lock().unwrap().created.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, request: CreateGatewayOrder) -> Result<GatewayOrder, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        if state.fail_always {
            return Err(PaymentError::provider("mock gateway unavailable"));
        }
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state.created.push(request.clone());
        let id = OrderId::new(format!("order_mock_{}", state.created.len()))
            .map_err(|e| PaymentError::provider(e.to_string()))?;
        Ok(GatewayOrder {
            id,
            amount: request.amount,
            receipt: request.receipt,
            status: "created".to_string(),
        })
    }

    fn key_id(&self) -> &str {
        Self::KEY_ID
    }
}
