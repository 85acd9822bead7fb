//! API error types with HTTP response mapping.

use application::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use store::StoreError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
///
/// Every error renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed path or body.
    #[error("{0}")]
    BadRequest(String),

    /// Error raised by an application service.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => service_status(err),
        }
    }
}

fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Domain(domain) => match domain {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::IllegalOperation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        },
        ServiceError::Store(StoreError::ConcurrencyConflict { .. }) => StatusCode::CONFLICT,
        ServiceError::Gateway(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Service(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        metrics::counter!("http_errors_total", "status" => status.as_str().to_string()).increment(1);
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
