use common::Version;
use thiserror::Error;

/// Errors that can occur when reading or writing entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A save carried a version other than the stored one.
    #[error(
        "Concurrency conflict for {entity} {id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        entity: &'static str,
        id: String,
        expected: Version,
        actual: Version,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
