//! Health and Prometheus metrics endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `"up"` or `"down"`.
    pub gateway: &'static str,
}

/// GET /health: liveness plus payment gateway reachability.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let gateway = if state.gateway.is_available().await {
        "up"
    } else {
        "down"
    };
    Json(HealthResponse {
        status: "ok",
        gateway,
    })
}

/// GET /metrics: Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.metrics.render(),
    )
}
