//! Payment endpoints and the gateway webhook.

use std::sync::Arc;

use application::{GatewayWebhook, PaymentStatusReport};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId};
use domain::{Entity, Money, Payment, PaymentMethod, PaymentStatus};
use serde::{Deserialize, Serialize};

use super::{optional_json, parse_id};
use crate::AppState;
use crate::error::ApiError;

/// Header carrying the hex HMAC-SHA256 of the webhook body.
pub const SIGNATURE_HEADER: &str = "x-signature";

// -- Request types --

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    pub status: Option<String>,
    pub method: Option<String>,
    /// Only payments created today.
    #[serde(default)]
    pub today: bool,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub transaction_id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ReasonRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(alias = "transaction_id")]
    pub transaction_id: String,
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub value: Money,
    pub transaction_id: Option<String>,
    pub qr_code: Option<String>,
    pub payment_link: Option<String>,
    pub reason: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id(),
            order_id: payment.order_id(),
            method: payment.method(),
            status: payment.status(),
            value: payment.value(),
            transaction_id: payment.transaction_id().map(String::from),
            qr_code: payment.qr_code().map(String::from),
            payment_link: payment.payment_link().map(String::from),
            reason: payment.reason().map(String::from),
            message: payment.status_message(),
            created_at: payment.created_at(),
            processed_at: payment.processed_at(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub approved: bool,
    pub message: String,
}

impl From<PaymentStatusReport> for PaymentStatusResponse {
    fn from(report: PaymentStatusReport) -> Self {
        Self {
            payment_id: report.payment_id,
            order_id: report.order_id,
            status: report.status,
            approved: report.approved,
            message: report.message,
        }
    }
}

fn payment_id(raw: &str) -> Result<PaymentId, ApiError> {
    parse_id(raw, PaymentId::parse)
}

fn reason_or(body: &Bytes, fallback: &str) -> Result<String, ApiError> {
    let req: ReasonRequest = optional_json(body)?;
    Ok(req
        .reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string()))
}

// -- Handlers --

/// GET /payments?status=&method=&today=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PaymentQuery>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = &state.services.payments;
    let found = if let Some(status) = query.status.as_deref() {
        payments.list_by_status(status).await?
    } else if let Some(method) = query.method.as_deref() {
        payments.list_by_method(method).await?
    } else if query.today {
        payments.today().await?
    } else {
        payments.list().await?
    };
    Ok(Json(found.iter().map(PaymentResponse::from).collect()))
}

/// GET /payments/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = state.services.payments.get(payment_id(&id)?).await?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// GET /payments/order/{order_id}: payment status of an order.
pub async fn by_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let order_id = parse_id(&order_id, OrderId::parse)?;
    let report = state.services.payments.status_by_order(order_id).await?;
    Ok(Json(PaymentStatusResponse::from(report)))
}

/// POST /payments/{id}/approve with an optional `{"transactionId": ...}`
#[tracing::instrument(skip(state, body))]
pub async fn approve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PaymentResponse>, ApiError> {
    let req: ApproveRequest = optional_json(&body)?;
    let payment = state
        .services
        .payments
        .approve(payment_id(&id)?, req.transaction_id)
        .await?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// POST /payments/{id}/reject with an optional `{"reason": ...}`
#[tracing::instrument(skip(state, body))]
pub async fn reject(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PaymentResponse>, ApiError> {
    let reason = reason_or(&body, "Rejected by operator")?;
    let payment = state
        .services
        .payments
        .reject(payment_id(&id)?, &reason)
        .await?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// POST /payments/{id}/cancel with an optional `{"reason": ...}`
#[tracing::instrument(skip(state, body))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PaymentResponse>, ApiError> {
    let reason = reason_or(&body, "Canceled by operator")?;
    let payment = state
        .services
        .payments
        .cancel(payment_id(&id)?, &reason)
        .await?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// POST /payments/{id}/refund with an optional `{"reason": ...}`
#[tracing::instrument(skip(state, body))]
pub async fn refund(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PaymentResponse>, ApiError> {
    let reason = reason_or(&body, "Refunded by operator")?;
    let payment = state
        .services
        .payments
        .refund(payment_id(&id)?, &reason)
        .await?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// POST /payments/webhook
///
/// The raw body is kept for signature verification, which reads the
/// `x-signature` header.
#[tracing::instrument(skip(state, headers, body))]
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payload = std::str::from_utf8(&body)
        .map_err(|_| ApiError::BadRequest("Webhook body must be UTF-8".to_string()))?;
    let req: WebhookRequest = serde_json::from_str(payload)
        .map_err(|e| ApiError::BadRequest(format!("Invalid webhook body: {e}")))?;
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let payment = state
        .services
        .payments
        .handle_webhook(
            &GatewayWebhook {
                transaction_id: req.transaction_id,
                status: req.status,
            },
            payload,
            signature,
        )
        .await?;
    Ok(Json(PaymentResponse::from(&payment)))
}
