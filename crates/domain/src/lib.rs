//! Domain layer for the fast-food ordering system.
//!
//! This crate provides the core business model:
//! - Value objects (`Money`, `TaxId`, `Email`)
//! - Catalog (`Product`, `Category`)
//! - `Customer`
//! - `Order` aggregate with line items and its status machine
//! - `Payment` with its status machine and gateway status mapping
//!
//! Everything here is synchronous and free of I/O. Persistence, gateways and
//! notifications live in the outer crates.

pub mod catalog;
pub mod customer;
pub mod entity;
pub mod error;
pub mod order;
pub mod payment;
pub mod value_objects;

pub use catalog::{Category, Product, ProductParts};
pub use customer::{Customer, CustomerParts};
pub use entity::{Entity, StatusMachine};
pub use error::{DomainError, Result};
pub use order::{CustomerRef, LineItem, LineItemParts, Order, OrderParts, OrderStatus};
pub use payment::{IntegrationData, Payment, PaymentMethod, PaymentParts, PaymentStatus};
pub use value_objects::{Email, Money, TaxId};
