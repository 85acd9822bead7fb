//! Order use cases: kitchen flow, item changes and order queries.

use std::sync::Arc;

use chrono::Utc;
use common::{CustomerId, LineItemId, OrderId, ProductId};
use domain::{Entity, Order, OrderStatus};
use projections::{KitchenTicket, WaitTimeReport};
use store::{OrderRepository, ProductRepository};

use super::today;
use crate::error::{Result, ServiceError};
use crate::ports::Notifier;
use crate::ports::notifier::log_failure;

/// Drives orders through the kitchen and answers order queries.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    notifier: Arc<dyn Notifier>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orders,
            products,
            notifier,
        }
    }

    pub async fn get(&self, id: OrderId) -> Result<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", id))
    }

    pub async fn list(&self) -> Result<Vec<Order>> {
        Ok(self.orders.find_all().await?)
    }

    /// Orders in the status named by `status`, parsed case-insensitively.
    pub async fn list_by_status(&self, status: &str) -> Result<Vec<Order>> {
        let status: OrderStatus = status.parse()?;
        Ok(self.orders.find_by_status(status).await?)
    }

    pub async fn list_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        Ok(self.orders.find_by_customer(customer_id).await?)
    }

    pub async fn list_active(&self) -> Result<Vec<Order>> {
        Ok(self.orders.find_active().await?)
    }

    pub async fn list_today(&self) -> Result<Vec<Order>> {
        let (from, to) = today();
        Ok(self.orders.find_created_between(from, to).await?)
    }

    pub async fn kitchen_queue(&self) -> Result<Vec<KitchenTicket>> {
        let orders = self.orders.find_for_kitchen().await?;
        Ok(projections::kitchen_queue(&orders))
    }

    pub async fn wait_time(&self, id: OrderId) -> Result<WaitTimeReport> {
        let order = self.get(id).await?;
        Ok(projections::wait_time(&order, Utc::now()))
    }

    pub async fn start_preparation(&self, id: OrderId) -> Result<Order> {
        self.transition(id, OrderStatus::InPreparation).await
    }

    pub async fn mark_ready(&self, id: OrderId) -> Result<Order> {
        self.transition(id, OrderStatus::Ready).await
    }

    pub async fn finalize(&self, id: OrderId) -> Result<Order> {
        self.transition(id, OrderStatus::Finalized).await
    }

    /// Moves an order to the status named by `status`.
    pub async fn update_status(&self, id: OrderId, status: &str) -> Result<Order> {
        let next: OrderStatus = status.parse()?;
        self.transition(id, next).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<Order> {
        let mut order = self.get(order_id).await?;
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;
        order.add_product(&product, quantity, notes.as_deref())?;
        let order = self.orders.save(order).await?;
        tracing::info!(%order_id, %product_id, quantity, total = %order.total(), "item added");
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, order_id: OrderId, item_id: LineItemId) -> Result<Order> {
        let mut order = self.get(order_id).await?;
        order.remove_item(item_id)?;
        let order = self.orders.save(order).await?;
        tracing::info!(%order_id, %item_id, total = %order.total(), "item removed");
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn transition(&self, id: OrderId, next: OrderStatus) -> Result<Order> {
        let mut order = self.get(id).await?;
        let previous = order.status();
        order.transition_to(next)?;
        let order = self.orders.save(order).await?;

        metrics::counter!("order_transitions_total", "to" => next.as_str()).increment(1);
        tracing::info!(order_id = %order.id(), from = %previous, to = %next, "order status changed");

        log_failure(
            "order_status_changed",
            self.notifier.order_status_changed(&order, previous).await,
        );
        if next == OrderStatus::Ready {
            log_failure("order_ready", self.notifier.order_ready(&order).await);
        }
        Ok(order)
    }
}
