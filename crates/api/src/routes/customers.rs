//! Customer endpoints.

use std::sync::Arc;

use application::{CustomerUpdate, NewCustomer};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::CustomerId;
use domain::{Customer, Entity};
use projections::CustomerStatistics;
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    pub tax_id: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub accepts_marketing: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub accepts_marketing: bool,
    /// Enables or disables the customer when present.
    pub enabled: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub search: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    /// Only customers who placed an order.
    #[serde(default)]
    pub active: bool,
    /// Only customers who may receive campaigns.
    #[serde(default)]
    pub campaign: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub name: String,
    /// Formatted as `XXX.XXX.XXX-XX`.
    pub tax_id: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub enabled: bool,
    pub accepts_marketing: bool,
    pub total_orders: u32,
    pub last_order_at: Option<DateTime<Utc>>,
    pub identified: bool,
    pub campaign_eligible: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id(),
            name: customer.name().to_string(),
            tax_id: customer.tax_id().map(|t| t.formatted()),
            email: customer.email().to_string(),
            phone: customer.phone().map(String::from),
            enabled: customer.is_enabled(),
            accepts_marketing: customer.accepts_marketing(),
            total_orders: customer.total_orders(),
            last_order_at: customer.last_order_at(),
            identified: customer.is_identified(),
            campaign_eligible: customer.is_campaign_eligible(),
            created_at: customer.created_at(),
        }
    }
}

/// POST /customers
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state
        .services
        .customers
        .register(NewCustomer {
            name: req.name,
            tax_id: req.tax_id,
            email: req.email,
            phone: req.phone,
            accepts_marketing: req.accepts_marketing,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CustomerResponse::from(&customer))))
}

/// GET /customers?search=&email=&taxId=&active=&campaign=
///
/// `email` and `taxId` are exact lookups and answer with at most one customer.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = &state.services.customers;
    let found = if let Some(email) = query.email.as_deref() {
        vec![customers.get_by_email(email).await?]
    } else if let Some(tax_id) = query.tax_id.as_deref() {
        vec![customers.get_by_tax_id(tax_id).await?]
    } else if let Some(fragment) = query.search.as_deref() {
        customers.search(fragment).await?
    } else if query.campaign {
        customers.campaign_audience().await?
    } else if query.active {
        customers.list_active().await?
    } else {
        customers.list().await?
    };
    Ok(Json(found.iter().map(CustomerResponse::from).collect()))
}

/// GET /customers/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = parse_id(&id, CustomerId::parse)?;
    let customer = state.services.customers.get(id).await?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// PUT /customers/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = parse_id(&id, CustomerId::parse)?;
    let customers = &state.services.customers;
    let mut customer = customers
        .update(
            id,
            CustomerUpdate {
                name: req.name,
                email: req.email,
                phone: req.phone,
                accepts_marketing: req.accepts_marketing,
            },
        )
        .await?;
    match req.enabled {
        Some(true) if !customer.is_enabled() => customer = customers.enable(id).await?,
        Some(false) if customer.is_enabled() => customer = customers.disable(id).await?,
        _ => {}
    }
    Ok(Json(CustomerResponse::from(&customer)))
}

/// DELETE /customers/{id}
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, CustomerId::parse)?;
    state.services.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /customers/statistics
pub async fn statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CustomerStatistics>, ApiError> {
    Ok(Json(state.services.customers.statistics().await?))
}
