//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CustomerId, LineItemId, OrderId, ProductId, Version};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::customer::Customer;
use crate::entity::{Entity, StatusMachine};
use crate::error::{DomainError, Result};
use crate::value_objects::Money;

use super::{LineItem, OrderStatus};

/// Snapshot of the customer who placed the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
}

impl From<&Customer> for CustomerRef {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id(),
            name: customer.name().to_string(),
            email: customer.email().to_string(),
        }
    }
}

/// Order aggregate root.
///
/// Owns its line items and keeps the total in step with them: every
/// operation that touches the items recomputes the total before returning,
/// and every operation validates completely before mutating anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,

    /// Current version for optimistic concurrency.
    #[serde(default)]
    version: Version,

    customer: CustomerRef,

    /// Never empty.
    items: Vec<LineItem>,

    status: OrderStatus,

    /// Sum of the line totals.
    total: Money,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    preparation_started_at: Option<DateTime<Utc>>,
    ready_at: Option<DateTime<Utc>>,
    finalized_at: Option<DateTime<Utc>>,
}

/// Stored representation of an order.
#[derive(Debug, Clone)]
pub struct OrderParts {
    pub id: OrderId,
    pub version: Version,
    pub customer: CustomerRef,
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub preparation_started_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Places a new order for `customer` in the `Received` status.
    ///
    /// Lines for the same product are merged into one.
    pub fn place(customer: &Customer, items: Vec<LineItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "Order must contain at least one item",
            ));
        }

        let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
        for item in items {
            merge_into(&mut merged, item)?;
        }

        let now = Utc::now();
        let mut order = Self {
            id: OrderId::new(),
            version: Version::initial(),
            customer: CustomerRef::from(customer),
            items: merged,
            status: OrderStatus::Received,
            total: Money::ZERO,
            created_at: now,
            updated_at: now,
            preparation_started_at: None,
            ready_at: None,
            finalized_at: None,
        };
        order.recalculate_total();
        Ok(order)
    }

    /// Rebuilds an order from its stored parts. The total is recomputed.
    pub fn restore(parts: OrderParts) -> Result<Self> {
        if parts.items.is_empty() {
            return Err(DomainError::validation(
                "Order must contain at least one item",
            ));
        }
        let mut order = Self {
            id: parts.id,
            version: parts.version,
            customer: parts.customer,
            items: parts.items,
            status: parts.status,
            total: Money::ZERO,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            preparation_started_at: parts.preparation_started_at,
            ready_at: parts.ready_at,
            finalized_at: parts.finalized_at,
        };
        order.recalculate_total();
        Ok(order)
    }

    // ========== Item operations ==========

    /// Adds a line, merging it into an existing line for the same product.
    pub fn add_item(&mut self, item: LineItem) -> Result<()> {
        self.ensure_items_modifiable()?;
        merge_into(&mut self.items, item)?;
        self.recalculate_total();
        self.touch();
        Ok(())
    }

    /// Adds `quantity` units of `product` at its current price.
    pub fn add_product(
        &mut self,
        product: &Product,
        quantity: u32,
        notes: Option<&str>,
    ) -> Result<()> {
        self.ensure_items_modifiable()?;
        let item = LineItem::new(product, quantity, notes)?;
        self.add_item(item)
    }

    /// Removes a line and returns it. The last line can never be removed.
    pub fn remove_item(&mut self, item_id: LineItemId) -> Result<LineItem> {
        self.ensure_items_modifiable()?;
        let index = self
            .items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or_else(|| DomainError::not_found("Line item", item_id))?;
        if self.items.len() == 1 {
            return Err(DomainError::illegal(
                "Cannot remove the last item of an order",
            ));
        }

        let removed = self.items.remove(index);
        self.recalculate_total();
        self.touch();
        Ok(removed)
    }

    // ========== Status transitions ==========

    /// Moves the order to `next`, stamping the timestamp of the stage it reaches.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<()> {
        self.status.validate_transition(next)?;

        let now = Utc::now();
        match next {
            OrderStatus::InPreparation => self.preparation_started_at = Some(now),
            OrderStatus::Ready => self.ready_at = Some(now),
            OrderStatus::Finalized => self.finalized_at = Some(now),
            OrderStatus::Received => {}
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn start_preparation(&mut self) -> Result<()> {
        self.transition_to(OrderStatus::InPreparation)
    }

    pub fn mark_ready(&mut self) -> Result<()> {
        self.transition_to(OrderStatus::Ready)
    }

    pub fn finalize(&mut self) -> Result<()> {
        self.transition_to(OrderStatus::Finalized)
    }

    // ========== Queries ==========

    /// Returns true while the order has not reached the kitchen pass.
    pub fn can_be_cancelled(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Received | OrderStatus::InPreparation
        )
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(LineItem::quantity).sum()
    }

    /// Item summary such as `"2x Burger, 1x Fries"`.
    pub fn summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{}x {}", item.quantity(), item.product_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn contains_product(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product_id() == product_id)
    }

    pub fn is_visible_in_kitchen(&self) -> bool {
        self.status.is_visible_in_kitchen()
    }

    pub fn kitchen_priority(&self) -> u8 {
        self.status.kitchen_priority()
    }

    pub fn customer(&self) -> &CustomerRef {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn preparation_started_at(&self) -> Option<DateTime<Utc>> {
        self.preparation_started_at
    }

    pub fn ready_at(&self) -> Option<DateTime<Utc>> {
        self.ready_at
    }

    pub fn finalized_at(&self) -> Option<DateTime<Utc>> {
        self.finalized_at
    }

    // ========== Internal ==========

    fn ensure_items_modifiable(&self) -> Result<()> {
        if !self.status.can_modify_items() {
            return Err(DomainError::illegal(format!(
                "Items can only be changed while the order is RECEIVED (current: {})",
                self.status
            )));
        }
        Ok(())
    }

    fn recalculate_total(&mut self) {
        self.total = self.items.iter().map(LineItem::total).sum();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn kind() -> &'static str {
        "Order"
    }

    fn id(&self) -> OrderId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

/// Adds `item` to `items`, bumping the quantity of an existing line for the
/// same product instead of pushing a duplicate.
fn merge_into(items: &mut Vec<LineItem>, item: LineItem) -> Result<()> {
    match items
        .iter_mut()
        .find(|existing| existing.product_id() == item.product_id())
    {
        Some(existing) => existing.update_quantity(existing.quantity() + item.quantity()),
        None => {
            items.push(item);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::value_objects::Email;
    use rust_decimal_macros::dec;

    fn customer() -> Customer {
        Customer::new(
            "Maria Silva",
            None,
            Email::parse("maria@example.com").unwrap(),
            None,
            false,
        )
        .unwrap()
    }

    fn product(name: &str, price: rust_decimal::Decimal) -> Product {
        Product::new(name, None, price, Category::Snack).unwrap()
    }

    fn order_with(items: &[(&Product, u32)]) -> Order {
        let lines = items
            .iter()
            .map(|(p, q)| LineItem::new(p, *q, None).unwrap())
            .collect();
        Order::place(&customer(), lines).unwrap()
    }

    #[test]
    fn total_is_exact_sum_of_lines() {
        let p1 = product("Burger", dec!(10.00));
        let p2 = product("Fries", dec!(5.00));
        let order = order_with(&[(&p1, 2), (&p2, 1)]);
        assert_eq!(order.total().amount(), dec!(25.00));
        assert_eq!(order.status(), OrderStatus::Received);
        assert_eq!(order.customer().name, "Maria Silva");
    }

    #[test]
    fn decimal_sums_do_not_drift() {
        let p = product("Gum", dec!(0.10));
        let q = product("Mint", dec!(0.20));
        let order = order_with(&[(&p, 1), (&q, 1)]);
        assert_eq!(order.total().amount(), dec!(0.30));
    }

    #[test]
    fn most_expensive_products_total_exactly() {
        let err = Product::new("Gold Burger", None, rust_decimal::Decimal::MAX, Category::Snack)
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let gold = product("Gold Burger", dec!(99999.99));
        let caviar = product("Caviar Fries", dec!(99999.99));
        let order = order_with(&[(&gold, 99), (&caviar, 99)]);
        assert_eq!(order.total().amount(), dec!(19799998.02));
        assert_eq!(gold.calculate_total(u32::MAX).unwrap().amount(), dec!(429496686550327.05));
    }

    #[test]
    fn empty_order_is_rejected() {
        let err = Order::place(&customer(), vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn place_merges_duplicate_products() {
        let p = product("Burger", dec!(10.00));
        let order = order_with(&[(&p, 1), (&p, 2)]);
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity(), 3);
        assert_eq!(order.total().amount(), dec!(30.00));
    }

    #[test]
    fn add_product_merges_and_recomputes() {
        let p1 = product("Burger", dec!(10.00));
        let p2 = product("Soda", dec!(4.50));
        let mut order = order_with(&[(&p1, 1)]);

        order.add_product(&p1, 2, None).unwrap();
        order.add_product(&p2, 1, None).unwrap();

        assert_eq!(order.items().len(), 2);
        assert_eq!(order.total_quantity(), 4);
        assert_eq!(order.total().amount(), dec!(34.50));
        assert_eq!(order.summary(), "3x Burger, 1x Soda");
    }

    #[test]
    fn merge_beyond_limit_fails_and_leaves_order_unchanged() {
        let p = product("Burger", dec!(10.00));
        let mut order = order_with(&[(&p, 98)]);
        let err = order.add_product(&p, 2, None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(order.items()[0].quantity(), 98);
        assert_eq!(order.total().amount(), dec!(980.00));
    }

    #[test]
    fn remove_item_recomputes_total() {
        let p1 = product("Burger", dec!(10.00));
        let p2 = product("Fries", dec!(5.00));
        let mut order = order_with(&[(&p1, 2), (&p2, 1)]);
        let fries = order.items()[1].id();

        let removed = order.remove_item(fries).unwrap();
        assert_eq!(removed.product_name(), "Fries");
        assert_eq!(order.total().amount(), dec!(20.00));
    }

    #[test]
    fn removing_last_item_is_illegal() {
        let p = product("Burger", dec!(10.00));
        let mut order = order_with(&[(&p, 1)]);
        let only = order.items()[0].id();
        let err = order.remove_item(only).unwrap_err();
        assert!(matches!(err, DomainError::IllegalOperation(_)));
        assert_eq!(order.items().len(), 1);
    }

    #[test]
    fn removing_unknown_item_is_not_found() {
        let p = product("Burger", dec!(10.00));
        let mut order = order_with(&[(&p, 1)]);
        let err = order.remove_item(LineItemId::new()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn items_are_frozen_after_received() {
        let p = product("Burger", dec!(10.00));
        let mut order = order_with(&[(&p, 1)]);
        order.start_preparation().unwrap();

        let err = order.add_product(&p, 1, None).unwrap_err();
        assert!(matches!(err, DomainError::IllegalOperation(_)));
        let id = order.items()[0].id();
        let err = order.remove_item(id).unwrap_err();
        assert!(matches!(err, DomainError::IllegalOperation(_)));
    }

    #[test]
    fn lifecycle_stamps_stage_timestamps() {
        let p = product("Burger", dec!(10.00));
        let mut order = order_with(&[(&p, 1)]);
        assert!(order.can_be_cancelled());

        order.start_preparation().unwrap();
        assert!(order.preparation_started_at().is_some());
        assert!(order.can_be_cancelled());

        order.mark_ready().unwrap();
        assert!(order.ready_at().is_some());
        assert!(!order.can_be_cancelled());

        order.finalize().unwrap();
        assert!(order.finalized_at().is_some());
        assert!(!order.is_visible_in_kitchen());
    }

    #[test]
    fn skipping_a_stage_is_invalid() {
        let p = product("Burger", dec!(10.00));
        let mut order = order_with(&[(&p, 1)]);
        let err = order.mark_ready().unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                entity: "order",
                from: "RECEIVED".to_string(),
                to: "READY".to_string(),
            }
        );
        assert_eq!(order.status(), OrderStatus::Received);
        assert!(order.ready_at().is_none());
    }

    #[test]
    fn restore_rejects_empty_items_and_recomputes_total() {
        let p = product("Burger", dec!(10.00));
        let order = order_with(&[(&p, 3)]);
        let parts = OrderParts {
            id: order.id(),
            version: Version::new(4),
            customer: order.customer().clone(),
            items: order.items().to_vec(),
            status: OrderStatus::Ready,
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            preparation_started_at: None,
            ready_at: None,
            finalized_at: None,
        };
        let restored = Order::restore(parts.clone()).unwrap();
        assert_eq!(restored.total().amount(), dec!(30.00));
        assert_eq!(restored.status(), OrderStatus::Ready);
        assert_eq!(restored.version(), Version::new(4));

        let empty = OrderParts {
            items: vec![],
            ..parts
        };
        assert!(Order::restore(empty).is_err());
    }
}
