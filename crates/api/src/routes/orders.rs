//! Order and kitchen endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use common::{CustomerId, LineItemId, OrderId, ProductId};
use domain::{CustomerRef, Entity, LineItem, Money, Order, OrderStatus};
use projections::{KitchenTicket, WaitTimeReport};
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    /// Only orders that are not finalized.
    #[serde(default)]
    pub active: bool,
    /// Only orders created today.
    #[serde(default)]
    pub today: bool,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: u32,
    pub notes: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer: CustomerRef,
    pub items: Vec<LineItemResponse>,
    pub status: OrderStatus,
    pub status_name: &'static str,
    pub total: Money,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub preparation_started_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub finalized_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total: Money,
    pub notes: Option<String>,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id(),
            product_id: item.product_id(),
            product_name: item.product_name().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            total: item.total(),
            notes: item.notes().map(String::from),
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            customer: order.customer().clone(),
            items: order.items().iter().map(LineItemResponse::from).collect(),
            status: order.status(),
            status_name: order.status().display_name(),
            total: order.total(),
            summary: order.summary(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            preparation_started_at: order.preparation_started_at(),
            ready_at: order.ready_at(),
            finalized_at: order.finalized_at(),
        }
    }
}

fn order_id(raw: &str) -> Result<OrderId, ApiError> {
    parse_id(raw, OrderId::parse)
}

// -- Handlers --

/// GET /orders?status=&customerId=&active=&today=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = &state.services.orders;
    let found = if let Some(status) = query.status.as_deref() {
        orders.list_by_status(status).await?
    } else if let Some(customer_id) = query.customer_id.as_deref() {
        let customer_id = parse_id(customer_id, CustomerId::parse)?;
        orders.list_by_customer(customer_id).await?
    } else if query.today {
        orders.list_today().await?
    } else if query.active {
        orders.list_active().await?
    } else {
        orders.list().await?
    };
    Ok(Json(found.iter().map(OrderResponse::from).collect()))
}

/// GET /orders/kitchen: the kitchen display queue.
pub async fn kitchen(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<KitchenTicket>>, ApiError> {
    Ok(Json(state.services.orders.kitchen_queue().await?))
}

/// GET /orders/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.services.orders.get(order_id(&id)?).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders/{id}/wait-time
pub async fn wait_time(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WaitTimeReport>, ApiError> {
    Ok(Json(state.services.orders.wait_time(order_id(&id)?).await?))
}

/// POST /orders/{id}/prepare
#[tracing::instrument(skip(state))]
pub async fn prepare(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .services
        .orders
        .start_preparation(order_id(&id)?)
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/ready
#[tracing::instrument(skip(state))]
pub async fn ready(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.services.orders.mark_ready(order_id(&id)?).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/finalize
#[tracing::instrument(skip(state))]
pub async fn finalize(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.services.orders.finalize(order_id(&id)?).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// PUT /orders/{id}/status with `{"status": "READY"}`
#[tracing::instrument(skip(state, req), fields(status = %req.status))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .services
        .orders
        .update_status(order_id(&id)?, &req.status)
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/items
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let product_id = parse_id(&req.product_id, ProductId::parse)?;
    let order = state
        .services
        .orders
        .add_item(order_id(&id)?, product_id, req.quantity, req.notes)
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// DELETE /orders/{id}/items/{item_id}
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<OrderResponse>, ApiError> {
    let item_id = parse_id(&item_id, LineItemId::parse)?;
    let order = state
        .services
        .orders
        .remove_item(order_id(&id)?, item_id)
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}
