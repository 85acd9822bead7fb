//! Repository contracts.
//!
//! Every `save` checks the entity's version against the stored one and
//! returns the entity with its new version. Lookups return `Ok(None)` for
//! missing entities; deciding whether that is an error is up to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, PaymentId, ProductId};
use domain::{
    Category, Customer, Email, Order, OrderStatus, Payment, PaymentMethod, PaymentStatus, Product,
    TaxId,
};

use crate::Result;

/// Persistence for catalog products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn save(&self, product: Product) -> Result<Product>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    async fn find_all(&self) -> Result<Vec<Product>>;

    async fn find_by_category(&self, category: Category) -> Result<Vec<Product>>;

    async fn find_available(&self) -> Result<Vec<Product>>;

    async fn find_available_by_category(&self, category: Category) -> Result<Vec<Product>>;

    /// Case-insensitive substring match on the name.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Product>>;

    /// Case-insensitive exact match on the trimmed name.
    async fn exists_by_name(&self, name: &str) -> Result<bool>;

    /// Like `exists_by_name`, ignoring the product with id `excluding`.
    async fn exists_by_name_excluding(&self, name: &str, excluding: ProductId) -> Result<bool>;

    /// Returns false if the product did not exist.
    async fn delete(&self, id: ProductId) -> Result<bool>;

    async fn count(&self) -> Result<usize>;

    async fn count_by_category(&self, category: Category) -> Result<usize>;

    async fn count_available(&self) -> Result<usize>;
}

/// Persistence for customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn save(&self, customer: Customer) -> Result<Customer>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>>;

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Customer>>;

    async fn find_all(&self) -> Result<Vec<Customer>>;

    async fn delete(&self, id: CustomerId) -> Result<bool>;

    async fn exists_by_tax_id(&self, tax_id: &TaxId) -> Result<bool>;

    async fn exists_by_email(&self, email: &Email) -> Result<bool>;

    async fn count(&self) -> Result<usize>;
}

/// Persistence for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn save(&self, order: Order) -> Result<Order>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    async fn find_all(&self) -> Result<Vec<Order>>;

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;

    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>>;

    /// Orders visible in the kitchen, by kitchen priority then creation time.
    async fn find_for_kitchen(&self) -> Result<Vec<Order>>;

    /// Orders created within `[from, to]`.
    async fn find_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>>;

    /// Orders that are not finalized.
    async fn find_active(&self) -> Result<Vec<Order>>;

    /// Returns true if any order, in any status, has a line for `product_id`.
    async fn exists_with_product(&self, product_id: ProductId) -> Result<bool>;

    async fn delete(&self, id: OrderId) -> Result<bool>;

    async fn count(&self) -> Result<usize>;

    async fn count_by_status(&self, status: OrderStatus) -> Result<usize>;
}

/// Persistence for payments.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn save(&self, payment: Payment) -> Result<Payment>;

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>>;

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Payment>>;

    async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>>;

    async fn find_all(&self) -> Result<Vec<Payment>>;

    async fn find_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>>;

    async fn find_by_method(&self, method: PaymentMethod) -> Result<Vec<Payment>>;

    async fn find_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Payment>>;

    async fn delete(&self, id: PaymentId) -> Result<bool>;

    async fn count(&self) -> Result<usize>;

    async fn count_by_status(&self, status: PaymentStatus) -> Result<usize>;
}
