//! Kitchen queue read model: the orders the kitchen still has to handle.

use chrono::{DateTime, Utc};
use common::OrderId;
use domain::{Entity, Money, Order, OrderStatus};
use serde::Serialize;

/// One row on the kitchen display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenTicket {
    pub order_id: OrderId,
    pub customer_name: String,
    pub status: OrderStatus,
    /// e.g. `"2x X-Burger, 1x Fries"`
    pub summary: String,
    pub total: Money,
    /// Sum of line quantities.
    pub item_count: u32,
    pub priority: u8,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for KitchenTicket {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id(),
            customer_name: order.customer().name.clone(),
            status: order.status(),
            summary: order.summary(),
            total: order.total(),
            item_count: order.total_quantity(),
            priority: order.kitchen_priority(),
            created_at: order.created_at(),
        }
    }
}

/// Builds the kitchen queue from the full order collection.
///
/// Finalized orders are dropped. The rest are sorted by kitchen priority
/// (ready first, then in preparation, then received) and, within a priority,
/// oldest first. The sort is stable, so orders with identical keys keep
/// their input order.
pub fn kitchen_queue<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<KitchenTicket> {
    let mut tickets: Vec<KitchenTicket> = orders
        .into_iter()
        .filter(|order| order.is_visible_in_kitchen())
        .map(KitchenTicket::from)
        .collect();
    tickets.sort_by_key(|ticket| (ticket.priority, ticket.created_at));
    tickets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use common::Version;
    use domain::{Category, Customer, Email, LineItem, OrderParts, Product};
    use rust_decimal_macros::dec;

    fn order(status: OrderStatus, minutes_ago: i64) -> Order {
        let customer = Customer::new(
            "Carla",
            None,
            Email::parse("carla@example.com").unwrap(),
            None,
            false,
        )
        .unwrap();
        let burger = Product::new("X-Burger", None, dec!(10.00), Category::Snack).unwrap();
        let fries = Product::new("Fries", None, dec!(5.00), Category::Side).unwrap();
        let placed = Order::place(
            &customer,
            vec![
                LineItem::new(&burger, 2, None).unwrap(),
                LineItem::new(&fries, 1, None).unwrap(),
            ],
        )
        .unwrap();
        let created = Utc::now() - Duration::minutes(minutes_ago);
        Order::restore(OrderParts {
            id: placed.id(),
            version: Version::initial(),
            customer: placed.customer().clone(),
            items: placed.items().to_vec(),
            status,
            created_at: created,
            updated_at: created,
            preparation_started_at: None,
            ready_at: None,
            finalized_at: None,
        })
        .unwrap()
    }

    #[test]
    fn finalized_orders_are_excluded() {
        let orders = vec![order(OrderStatus::Finalized, 5), order(OrderStatus::Received, 1)];
        let queue = kitchen_queue(&orders);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].status, OrderStatus::Received);
    }

    #[test]
    fn ready_before_preparing_before_received_then_fifo() {
        let received = order(OrderStatus::Received, 50);
        let preparing_new = order(OrderStatus::InPreparation, 10);
        let preparing_old = order(OrderStatus::InPreparation, 20);
        let ready = order(OrderStatus::Ready, 1);
        let orders = vec![
            received.clone(),
            preparing_new.clone(),
            ready.clone(),
            preparing_old.clone(),
        ];

        let ids: Vec<_> = kitchen_queue(&orders).iter().map(|t| t.order_id).collect();
        assert_eq!(
            ids,
            [ready.id(), preparing_old.id(), preparing_new.id(), received.id()]
        );
    }

    #[test]
    fn ticket_fields() {
        let orders = vec![order(OrderStatus::Received, 0)];
        let ticket = &kitchen_queue(&orders)[0];
        assert_eq!(ticket.customer_name, "Carla");
        assert_eq!(ticket.summary, "2x X-Burger, 1x Fries");
        assert_eq!(ticket.item_count, 3);
        assert_eq!(ticket.total.amount(), dec!(25.00));
        assert_eq!(ticket.priority, 3);
    }

    #[test]
    fn empty_input_gives_empty_queue() {
        assert!(kitchen_queue(&Vec::<Order>::new()).is_empty());
    }
}
