//! In-memory repository implementations.
//!
//! Each repository is a cheap `Clone` handle over shared storage, so the
//! same instance can be handed to several services.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, PaymentId, ProductId};
use domain::{
    Category, Customer, Email, Entity, Order, OrderStatus, Payment, PaymentMethod, PaymentStatus,
    Product, TaxId,
};

use crate::Result;
use crate::repository::{
    CustomerRepository, OrderRepository, PaymentRepository, ProductRepository,
};
use crate::table::Table;

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// In-memory product repository.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    table: Table<Product>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: Product) -> Result<Product> {
        self.table.save(product).await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.table.get(id).await)
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        Ok(self.table.all().await)
    }

    async fn find_by_category(&self, category: Category) -> Result<Vec<Product>> {
        Ok(self.table.filter(|p| p.category() == category).await)
    }

    async fn find_available(&self) -> Result<Vec<Product>> {
        Ok(self.table.filter(Product::is_available).await)
    }

    async fn find_available_by_category(&self, category: Category) -> Result<Vec<Product>> {
        Ok(self
            .table
            .filter(|p| p.is_available() && p.category() == category)
            .await)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Product>> {
        let needle = normalize(fragment);
        Ok(self
            .table
            .filter(|p| p.name().to_lowercase().contains(&needle))
            .await)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let name = normalize(name);
        Ok(self.table.any(|p| normalize(p.name()) == name).await)
    }

    async fn exists_by_name_excluding(&self, name: &str, excluding: ProductId) -> Result<bool> {
        let name = normalize(name);
        Ok(self
            .table
            .any(|p| p.id() != excluding && normalize(p.name()) == name)
            .await)
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        Ok(self.table.remove(id).await)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.table.count(|_| true).await)
    }

    async fn count_by_category(&self, category: Category) -> Result<usize> {
        Ok(self.table.count(|p| p.category() == category).await)
    }

    async fn count_available(&self) -> Result<usize> {
        Ok(self.table.count(Product::is_available).await)
    }
}

/// In-memory customer repository.
#[derive(Clone, Default)]
pub struct InMemoryCustomerRepository {
    table: Table<Customer>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn save(&self, customer: Customer) -> Result<Customer> {
        self.table.save(customer).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.table.get(id).await)
    }

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>> {
        Ok(self.table.find(|c| c.tax_id() == Some(tax_id)).await)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>> {
        Ok(self.table.find(|c| c.email() == email).await)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Customer>> {
        let needle = normalize(fragment);
        Ok(self
            .table
            .filter(|c| c.name().to_lowercase().contains(&needle))
            .await)
    }

    async fn find_all(&self) -> Result<Vec<Customer>> {
        Ok(self.table.all().await)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool> {
        Ok(self.table.remove(id).await)
    }

    async fn exists_by_tax_id(&self, tax_id: &TaxId) -> Result<bool> {
        Ok(self.table.any(|c| c.tax_id() == Some(tax_id)).await)
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool> {
        Ok(self.table.any(|c| c.email() == email).await)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.table.count(|_| true).await)
    }
}

/// In-memory order repository.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    table: Table<Order>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: Order) -> Result<Order> {
        self.table.save(order).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.table.get(id).await)
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        Ok(self.table.all().await)
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        Ok(self.table.filter(|o| o.status() == status).await)
    }

    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        Ok(self.table.filter(|o| o.customer().id == customer_id).await)
    }

    async fn find_for_kitchen(&self) -> Result<Vec<Order>> {
        let mut orders = self.table.filter(Order::is_visible_in_kitchen).await;
        orders.sort_by_key(|o| (o.kitchen_priority(), o.created_at()));
        Ok(orders)
    }

    async fn find_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>> {
        Ok(self
            .table
            .filter(|o| o.created_at() >= from && o.created_at() <= to)
            .await)
    }

    async fn find_active(&self) -> Result<Vec<Order>> {
        Ok(self.table.filter(|o| o.status() != OrderStatus::Finalized).await)
    }

    async fn exists_with_product(&self, product_id: ProductId) -> Result<bool> {
        let referencing = self
            .table
            .count(|o| o.items().iter().any(|item| item.product_id() == product_id))
            .await;
        Ok(referencing > 0)
    }

    async fn delete(&self, id: OrderId) -> Result<bool> {
        Ok(self.table.remove(id).await)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.table.count(|_| true).await)
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<usize> {
        Ok(self.table.count(|o| o.status() == status).await)
    }
}

/// In-memory payment repository.
#[derive(Clone, Default)]
pub struct InMemoryPaymentRepository {
    table: Table<Payment>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: Payment) -> Result<Payment> {
        self.table.save(payment).await
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>> {
        Ok(self.table.get(id).await)
    }

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Payment>> {
        Ok(self.table.find(|p| p.order_id() == order_id).await)
    }

    async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>> {
        Ok(self
            .table
            .find(|p| p.transaction_id() == Some(transaction_id))
            .await)
    }

    async fn find_all(&self) -> Result<Vec<Payment>> {
        Ok(self.table.all().await)
    }

    async fn find_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>> {
        Ok(self.table.filter(|p| p.status() == status).await)
    }

    async fn find_by_method(&self, method: PaymentMethod) -> Result<Vec<Payment>> {
        Ok(self.table.filter(|p| p.method() == method).await)
    }

    async fn find_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Payment>> {
        Ok(self
            .table
            .filter(|p| p.created_at() >= from && p.created_at() <= to)
            .await)
    }

    async fn delete(&self, id: PaymentId) -> Result<bool> {
        Ok(self.table.remove(id).await)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.table.count(|_| true).await)
    }

    async fn count_by_status(&self, status: PaymentStatus) -> Result<usize> {
        Ok(self.table.count(|p| p.status() == status).await)
    }
}
