//! Domain error types.

use thiserror::Error;

/// Errors raised by domain rules.
///
/// Every variant is a client error: none of them are retried internally and
/// each carries a message that can be shown to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Malformed input: missing field, out-of-range value or bad format.
    #[error("{0}")]
    Validation(String),

    /// The requested status change is not permitted from the current status.
    #[error("Invalid {entity} transition from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness rule was violated.
    #[error("{0}")]
    Conflict(String),

    /// A structurally valid request that breaks a business invariant.
    #[error("{0}")]
    IllegalOperation(String),
}

impl DomainError {
    /// Builds a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    /// Builds a not-found error for the given entity kind and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    /// Builds an illegal-operation error.
    pub fn illegal(message: impl Into<String>) -> Self {
        DomainError::IllegalOperation(message.into())
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
