//! Shared types for the fast-food ordering backend.

pub mod types;

pub use types::{CustomerId, LineItemId, OrderId, PaymentId, ProductId, Version};
