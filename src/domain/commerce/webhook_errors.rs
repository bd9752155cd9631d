//! Errors raised while verifying and processing Razorpay callbacks.
//!
//! Each variant maps to the HTTP status the gateway sees. Razorpay retries
//! any non-2xx delivery, so only transient failures return 5xx.

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

#[derive(Debug, Error)]
pub enum WebhookError {
    /// HMAC signature did not match.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Failed to parse the payload or a signature value.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required field missing from the payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Event acknowledged but deliberately not acted on.
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// Order could not move to the requested state.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Persistence failed; the delivery should be retried.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if Razorpay should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature
            | WebhookError::ParseError(_)
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,
            WebhookError::Ignored(_) => StatusCode::OK,
            WebhookError::InvalidTransition(_) => StatusCode::CONFLICT,
            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire code used in the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::ParseError(_) | WebhookError::MissingField(_) => "VALIDATION_FAILED",
            WebhookError::Ignored(_) => "IGNORED",
            WebhookError::InvalidTransition(_) => "CONFLICT",
            WebhookError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        use crate::domain::foundation::ErrorCode;
        match err.code {
            ErrorCode::InvalidStateTransition => WebhookError::InvalidTransition(err.message),
            code if code.is_not_found() => WebhookError::Ignored(err.message),
            ErrorCode::ValidationFailed | ErrorCode::CapacityReached => {
                WebhookError::Ignored(err.message)
            }
            _ => WebhookError::Database(err.to_string()),
        }
    }
}
