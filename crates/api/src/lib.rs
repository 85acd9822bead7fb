//! HTTP API for the fast-food ordering backend.
//!
//! Thin axum adapter over the application services: JSON DTOs, error to
//! status mapping, structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use application::{AppServices, Dependencies, InMemoryPaymentGateway, LogNotifier, PaymentGateway};
use axum::Router;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared state accessible from all handlers.
pub struct AppState {
    pub services: AppServices,
    pub gateway: Arc<dyn PaymentGateway>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// In-memory services around `gateway`, notifying through tracing.
    pub fn new(gateway: Arc<dyn PaymentGateway>, metrics: PrometheusHandle) -> Self {
        let deps = Dependencies::in_memory(gateway.clone(), Arc::new(LogNotifier));
        Self {
            services: AppServices::new(deps),
            gateway,
            metrics,
        }
    }

    /// State backed by an in-memory gateway configured from `config`.
    pub fn from_config(config: &Config, metrics: PrometheusHandle) -> Self {
        let gateway = InMemoryPaymentGateway::new(
            config.payment_link_base.as_str(),
            config.webhook_secret.clone(),
        );
        Self::new(Arc::new(gateway), metrics)
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/metrics", get(routes::system::metrics))
        // Catalog
        .route(
            "/products",
            post(routes::catalog::create).get(routes::catalog::list),
        )
        .route(
            "/products/{id}",
            get(routes::catalog::get)
                .put(routes::catalog::update)
                .delete(routes::catalog::remove),
        )
        .route("/products/{id}/activate", post(routes::catalog::activate))
        .route("/products/{id}/deactivate", post(routes::catalog::deactivate))
        .route("/categories", get(routes::catalog::categories))
        .route("/categories/statistics", get(routes::catalog::statistics))
        // Customers
        .route(
            "/customers",
            post(routes::customers::create).get(routes::customers::list),
        )
        .route("/customers/statistics", get(routes::customers::statistics))
        .route(
            "/customers/{id}",
            get(routes::customers::get)
                .put(routes::customers::update)
                .delete(routes::customers::remove),
        )
        // Orders
        .route("/checkout", post(routes::checkout::checkout))
        .route("/orders", get(routes::orders::list))
        .route("/orders/kitchen", get(routes::orders::kitchen))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/wait-time", get(routes::orders::wait_time))
        .route("/orders/{id}/prepare", post(routes::orders::prepare))
        .route("/orders/{id}/ready", post(routes::orders::ready))
        .route("/orders/{id}/finalize", post(routes::orders::finalize))
        .route("/orders/{id}/status", put(routes::orders::update_status))
        .route("/orders/{id}/items", post(routes::orders::add_item))
        .route(
            "/orders/{id}/items/{item_id}",
            delete(routes::orders::remove_item),
        )
        // Payments
        .route("/payments", get(routes::payments::list))
        .route("/payments/webhook", post(routes::payments::webhook))
        .route("/payments/order/{order_id}", get(routes::payments::by_order))
        .route("/payments/{id}", get(routes::payments::get))
        .route("/payments/{id}/approve", post(routes::payments::approve))
        .route("/payments/{id}/reject", post(routes::payments::reject))
        .route("/payments/{id}/cancel", post(routes::payments::cancel))
        .route("/payments/{id}/refund", post(routes::payments::refund))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
