//! Product and category endpoints.

use std::sync::Arc;

use application::ProductInput;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::ProductId;
use domain::{Category, Entity, Money, Product};
use projections::CategoryStatistics;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
}

impl ProductRequest {
    fn into_input(self) -> Result<ProductInput, ApiError> {
        Ok(ProductInput {
            category: self.category.parse()?,
            name: self.name,
            description: self.description,
            price: self.price,
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category: Option<String>,
    /// Only products that can be ordered.
    #[serde(default)]
    pub available: bool,
    /// Case-insensitive name fragment.
    pub search: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: Category,
    pub category_name: &'static str,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            description: product.description().map(String::from),
            price: product.price(),
            category: product.category(),
            category_name: product.category().display_name(),
            available: product.is_available(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub code: Category,
    pub name: &'static str,
    pub description: &'static str,
    pub has_products: bool,
}

fn responses(products: &[Product]) -> Vec<ProductResponse> {
    products.iter().map(ProductResponse::from).collect()
}

// -- Handlers --

/// POST /products
#[tracing::instrument(skip(state, req), fields(name = %req.name))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state.services.catalog.create(req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// GET /products?category=&available=&search=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let catalog = &state.services.catalog;
    let category = query.category.as_deref().map(str::parse::<Category>).transpose()?;

    let mut products = match (query.search.as_deref(), category) {
        (Some(fragment), _) => catalog.search(fragment).await?,
        (None, _) if query.available => catalog.list_available(category).await?,
        (None, Some(category)) => catalog.list_by_category(category).await?,
        (None, None) => catalog.list().await?,
    };
    if query.search.is_some() {
        products.retain(|p| {
            category.is_none_or(|c| p.category() == c) && (!query.available || p.is_available())
        });
    }
    Ok(Json(responses(&products)))
}

/// GET /products/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_id(&id, ProductId::parse)?;
    let product = state.services.catalog.get(id).await?;
    Ok(Json(ProductResponse::from(&product)))
}

/// PUT /products/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_id(&id, ProductId::parse)?;
    let product = state
        .services
        .catalog
        .update(id, req.into_input()?)
        .await?;
    Ok(Json(ProductResponse::from(&product)))
}

/// DELETE /products/{id}
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, ProductId::parse)?;
    state.services.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /products/{id}/activate
pub async fn activate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_id(&id, ProductId::parse)?;
    let product = state.services.catalog.activate(id).await?;
    Ok(Json(ProductResponse::from(&product)))
}

/// POST /products/{id}/deactivate
pub async fn deactivate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_id(&id, ProductId::parse)?;
    let product = state.services.catalog.deactivate(id).await?;
    Ok(Json(ProductResponse::from(&product)))
}

/// GET /categories
pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let catalog = &state.services.catalog;
    let stocked = catalog.categories_with_products().await?;
    Ok(Json(
        catalog
            .categories()
            .iter()
            .map(|&c| CategoryResponse {
                code: c,
                name: c.display_name(),
                description: c.description(),
                has_products: stocked.contains(&c),
            })
            .collect(),
    ))
}

/// GET /categories/statistics
pub async fn statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryStatistics>>, ApiError> {
    Ok(Json(state.services.catalog.category_statistics().await?))
}
