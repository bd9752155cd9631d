//! HTTP handlers for payment orders, client confirmation and webhooks.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::error::{ApiError, WebhookApiError};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::commerce::{
    ConfirmPaymentCommand, CreatePaymentOrderCommand, HandleRazorpayWebhookCommand,
};
use crate::ports::WebhookResult;

use super::dto::{
    CreateOrderRequest, CreateOrderResponse, OrderResponse, VerifyPaymentRequest,
    VerifyPaymentResponse, WebhookAckResponse,
};

const SIGNATURE_HEADER: &str = "x-razorpay-signature";
const EVENT_ID_HEADER: &str = "x-razorpay-event-id";

/// GET /api/payments/orders - the caller's orders, newest first
pub async fn list_my_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state.user_orders_handler().handle(&user.id).await?;
    let body: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(Json(body))
}

/// POST /api/payments/orders
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .create_order_handler()
        .handle(CreatePaymentOrderCommand {
            user_id: user.id,
            product: request.product(),
        })
        .await?;

    let order = result.order;
    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: order.id.to_string(),
            amount: order.amount.amount(),
            currency: order.amount.currency().to_string(),
            key_id: result.key_id,
            receipt: order.receipt,
        }),
    ))
}

/// POST /api/payments/verify
pub async fn verify_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let settlement = state
        .reconciler
        .confirm_payment(ConfirmPaymentCommand {
            user_id: user.id,
            order_id: request.order_id,
            payment_id: request.payment_id,
            signature: request.signature,
        })
        .await?;

    Ok(Json(VerifyPaymentResponse {
        order_id: settlement.order.id.to_string(),
        status: settlement.order.status,
        product: settlement.order.product,
        newly_granted: settlement.outcome.is_new(),
    }))
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// POST /api/webhooks/razorpay
///
/// The raw body is verified before parsing. Every outcome the gateway must
/// not retry answers 200.
pub async fn razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let result = state
        .webhooks
        .handle(HandleRazorpayWebhookCommand {
            payload: body.to_vec(),
            signature: header(&headers, SIGNATURE_HEADER),
            event_id: header(&headers, EVENT_ID_HEADER),
        })
        .await?;

    let ack = match result {
        WebhookResult::Processed => WebhookAckResponse {
            status: "processed",
            reason: None,
        },
        WebhookResult::AlreadyProcessed => WebhookAckResponse {
            status: "duplicate",
            reason: None,
        },
        WebhookResult::Ignored(reason) => WebhookAckResponse {
            status: "ignored",
            reason: Some(reason),
        },
    };
    Ok(Json(ack))
}
