//! Application error types.

use domain::DomainError;
use store::StoreError;
use thiserror::Error;

/// Errors returned by the application services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule or lookup failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The store rejected a read or write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The payment gateway failed or is unreachable.
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    /// A notification could not be delivered.
    #[error("Notification error: {0}")]
    Notification(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::Domain(DomainError::not_found(entity, id))
    }
}

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;
