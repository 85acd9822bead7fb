//! Checkout endpoint.

use std::sync::Arc;

use application::{CheckoutCustomer, CheckoutItem, CheckoutReceipt, CheckoutRequest};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::{OrderId, PaymentId, ProductId};
use domain::{Money, OrderStatus, PaymentMethod, PaymentStatus};
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub customer: CustomerBody,
    pub items: Vec<ItemBody>,
    pub payment_method: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBody {
    pub name: String,
    pub tax_id: Option<String>,
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub product_id: String,
    pub quantity: u32,
    pub notes: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total_value: Money,
    pub payment_method: PaymentMethod,
    pub payment_id: PaymentId,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub message: String,
}

impl From<CheckoutReceipt> for CheckoutResponse {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self {
            order_id: receipt.order_id,
            status: receipt.status,
            total_value: receipt.total,
            payment_method: receipt.payment_method,
            payment_id: receipt.payment_id,
            payment_status: receipt.payment_status,
            qr_code: receipt.qr_code,
            payment_link: receipt.payment_link,
            transaction_id: receipt.transaction_id,
            message: receipt.message,
        }
    }
}

impl CheckoutBody {
    fn into_request(self) -> Result<CheckoutRequest, ApiError> {
        let items = self
            .items
            .into_iter()
            .map(|item| {
                Ok(CheckoutItem {
                    product_id: parse_id(&item.product_id, ProductId::parse)?,
                    quantity: item.quantity,
                    notes: item.notes,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(CheckoutRequest {
            customer: CheckoutCustomer {
                name: self.customer.name,
                tax_id: self.customer.tax_id,
                email: self.customer.email,
            },
            items,
            payment_method: self.payment_method,
        })
    }
}

/// POST /checkout: places an order and starts its payment.
#[tracing::instrument(skip(state, body))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckoutBody>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let receipt = state
        .services
        .checkout
        .checkout(body.into_request()?)
        .await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse::from(receipt))))
}
