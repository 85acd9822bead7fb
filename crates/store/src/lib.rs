//! Persistence layer for the fast-food backend.
//!
//! Defines one repository contract per entity and ships thread-safe
//! in-memory implementations. Saves use optimistic concurrency: an entity
//! saved with a stale version is rejected with
//! [`StoreError::ConcurrencyConflict`].

pub mod error;
pub mod memory;
pub mod repository;
mod table;

pub use error::{Result, StoreError};
pub use memory::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryPaymentRepository,
    InMemoryProductRepository,
};
pub use repository::{CustomerRepository, OrderRepository, PaymentRepository, ProductRepository};
