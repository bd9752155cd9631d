//! Razorpay Orders API client.
//!
//! ```ignore
//! let config = RazorpayConfig::new(key_id, key_secret);
//! let gateway = RazorpayClient::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::{Money, OrderId};
use crate::ports::{CreateGatewayOrder, GatewayOrder, PaymentError, PaymentErrorCode, PaymentGateway};

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API credentials.
#[derive(Clone)]
pub struct RazorpayConfig {
    key_id: String,
    key_secret: SecretString,
    api_base_url: String,
    timeout: Duration,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct RazorpayClient {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::provider(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
    amount: u64,
    currency: String,
    #[serde(default)]
    receipt: Option<String>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetail {
    code: String,
    #[serde(default)]
    description: String,
}

/// Maps a non-2xx response to a `PaymentError`.
fn map_error_response(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<RazorpayErrorBody>(body).ok().map(|b| b.error);
    let message = detail
        .as_ref()
        .map(|d| d.description.clone())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("Razorpay returned {}", status));

    let code = match status.as_u16() {
        400 => PaymentErrorCode::InvalidRequest,
        401 | 403 => PaymentErrorCode::AuthenticationError,
        429 => PaymentErrorCode::RateLimitExceeded,
        _ => PaymentErrorCode::ProviderError,
    };
    let error = PaymentError::new(code, message);
    match detail {
        Some(d) => error.with_provider_code(d.code),
        None => error,
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: CreateGatewayOrder) -> Result<GatewayOrder, PaymentError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);
        let body = serde_json::json!({
            "amount": request.amount.amount(),
            "currency": request.amount.currency(),
            "receipt": request.receipt,
            "notes": request.notes,
        });

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error = map_error_response(status, &error_text);
            tracing::error!(status = %status, error = %error, "Razorpay create_order failed");
            return Err(error);
        }

        let order: RazorpayOrder = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Razorpay response: {}", e))
        })?;

        let amount = Money::new(order.amount, &order.currency)
            .map_err(|e| PaymentError::provider(format!("Unexpected order amount: {}", e)))?;
        let id = OrderId::new(order.id)
            .map_err(|e| PaymentError::provider(format!("Unexpected order id: {}", e)))?;

        Ok(GatewayOrder {
            id,
            amount,
            receipt: order.receipt.unwrap_or(request.receipt),
            status: order.status,
        })
    }

    fn key_id(&self) -> &str {
        &self.config.key_id
    }
}
