//! Route handlers, one module per resource.

pub mod catalog;
pub mod checkout;
pub mod customers;
pub mod orders;
pub mod payments;
pub mod system;

use std::fmt::Display;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Parses a path identifier, answering 400 on malformed input.
pub(crate) fn parse_id<T, E: Display>(
    raw: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, ApiError> {
    parse(raw.trim()).map_err(|e| ApiError::BadRequest(format!("Invalid id '{raw}': {e}")))
}

/// Decodes an optional JSON body; an empty body yields `T::default()`.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid body: {e}")))
}
