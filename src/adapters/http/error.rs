//! Uniform mapping from domain failures to HTTP responses.
//!
//! Every handler returns `Result<_, ApiError>`. The JSON body is always
//! `{ "code", "message", "details" }`.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::commerce::WebhookError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Standard error body for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn with_details(mut self, details: HashMap<String, String>) -> Self {
        self.details = details;
        self
    }
}

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl ApiError {
    pub fn bad_request(field: &str, message: impl Into<String>) -> Self {
        Self(DomainError::validation(field, message))
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.0.code)
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::InvalidSignature => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        code if code.is_not_found() => StatusCode::NOT_FOUND,
        ErrorCode::AlreadyExists
        | ErrorCode::CapacityReached
        | ErrorCode::ConcurrentModification
        | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::PaymentGatewayError => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!(error = %self.0, "request failed");
            ErrorResponse::new(ErrorCode::InternalError.to_string(), "Internal server error")
        } else {
            ErrorResponse::new(self.0.code.to_string(), self.0.message)
                .with_details(self.0.details)
        };
        (status, Json(body)).into_response()
    }
}

/// Webhook failures keep the gateway-facing status of `WebhookError`.
pub struct WebhookApiError(pub WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let message = if self.0.is_retryable() {
            tracing::error!(error = %self.0, "webhook processing failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(ErrorResponse::new(self.0.code(), message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(code: ErrorCode) -> StatusCode {
        ApiError::from(DomainError::new(code, "x")).into_response().status()
    }

    #[test]
    fn maps_error_taxonomy_to_status() {
        assert_eq!(status_of(ErrorCode::ValidationFailed), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ErrorCode::InvalidSignature), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ErrorCode::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ErrorCode::PaymentRequired), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(status_of(ErrorCode::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ErrorCode::LessonNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ErrorCode::CapacityReached), StatusCode::CONFLICT);
        assert_eq!(status_of(ErrorCode::ConcurrentModification), StatusCode::CONFLICT);
        assert_eq!(status_of(ErrorCode::PaymentGatewayError), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(ErrorCode::DatabaseError), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_errors_hide_their_message() {
        let response = ApiError::from(DomainError::new(
            ErrorCode::DatabaseError,
            "connection refused on 10.0.0.5",
        ))
        .into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn details_are_carried_through() {
        let response = ApiError::from(
            DomainError::new(ErrorCode::PaymentRequired, "pay first").with_detail("amount", "49900"),
        )
        .into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "PAYMENT_REQUIRED");
        assert_eq!(body["details"]["amount"], "49900");
    }

    #[test]
    fn ignored_webhook_is_acknowledged() {
        let response =
            WebhookApiError(WebhookError::Ignored("unknown order".into())).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
