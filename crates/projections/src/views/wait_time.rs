//! Wait-time report for a single order.

use chrono::{DateTime, Duration, Utc};
use common::OrderId;
use domain::{Entity, Order, OrderStatus};
use serde::Serialize;

/// How worrying the total wait is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitAlert {
    /// Up to 15 minutes.
    Normal,
    /// Up to 30 minutes.
    Attention,
    /// Up to 45 minutes.
    High,
    Critical,
}

impl WaitAlert {
    pub fn for_minutes(total_minutes: i64) -> Self {
        match total_minutes {
            m if m <= 15 => WaitAlert::Normal,
            m if m <= 30 => WaitAlert::Attention,
            m if m <= 45 => WaitAlert::High,
            _ => WaitAlert::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitTimeReport {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub preparation_started_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub finalized_at: Option<DateTime<Utc>>,
    /// Created until preparation started (or now).
    pub waiting_minutes: i64,
    /// Preparation start until ready (or now); zero before preparation.
    pub preparing_minutes: i64,
    /// Created until finalized (or now).
    pub total_minutes: i64,
    pub alert: WaitAlert,
    /// Total wait above 30 minutes.
    pub is_high: bool,
}

/// Measures how long `order` has been waiting as of `now`.
pub fn wait_time(order: &Order, now: DateTime<Utc>) -> WaitTimeReport {
    let created = order.created_at();
    let waiting = order.preparation_started_at().unwrap_or(now) - created;
    let preparing = order
        .preparation_started_at()
        .map(|started| order.ready_at().unwrap_or(now) - started)
        .unwrap_or_else(Duration::zero);
    let total = order.finalized_at().unwrap_or(now) - created;
    let total_minutes = total.num_minutes();

    WaitTimeReport {
        order_id: order.id(),
        status: order.status(),
        created_at: created,
        preparation_started_at: order.preparation_started_at(),
        ready_at: order.ready_at(),
        finalized_at: order.finalized_at(),
        waiting_minutes: waiting.num_minutes(),
        preparing_minutes: preparing.num_minutes(),
        total_minutes,
        alert: WaitAlert::for_minutes(total_minutes),
        is_high: total_minutes > 30,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Version;
    use domain::{Category, Customer, Email, LineItem, OrderParts, Product};
    use rust_decimal_macros::dec;

    fn order_at(
        created_ago: i64,
        started_ago: Option<i64>,
        ready_ago: Option<i64>,
        now: DateTime<Utc>,
    ) -> Order {
        let customer =
            Customer::new("Dani", None, Email::parse("dani@example.com").unwrap(), None, false)
                .unwrap();
        let product = Product::new("Wrap", None, dec!(12.00), Category::Snack).unwrap();
        let placed =
            Order::place(&customer, vec![LineItem::new(&product, 1, None).unwrap()]).unwrap();
        let at = |ago: i64| now - Duration::minutes(ago);
        let status = match (started_ago, ready_ago) {
            (_, Some(_)) => OrderStatus::Ready,
            (Some(_), None) => OrderStatus::InPreparation,
            _ => OrderStatus::Received,
        };
        Order::restore(OrderParts {
            id: placed.id(),
            version: Version::initial(),
            customer: placed.customer().clone(),
            items: placed.items().to_vec(),
            status,
            created_at: at(created_ago),
            updated_at: at(created_ago),
            preparation_started_at: started_ago.map(at),
            ready_at: ready_ago.map(at),
            finalized_at: None,
        })
        .unwrap()
    }

    #[test]
    fn alert_thresholds() {
        assert_eq!(WaitAlert::for_minutes(0), WaitAlert::Normal);
        assert_eq!(WaitAlert::for_minutes(15), WaitAlert::Normal);
        assert_eq!(WaitAlert::for_minutes(16), WaitAlert::Attention);
        assert_eq!(WaitAlert::for_minutes(30), WaitAlert::Attention);
        assert_eq!(WaitAlert::for_minutes(45), WaitAlert::High);
        assert_eq!(WaitAlert::for_minutes(46), WaitAlert::Critical);
    }

    #[test]
    fn received_order_only_waits() {
        let now = Utc::now();
        let report = wait_time(&order_at(10, None, None, now), now);
        assert_eq!(report.waiting_minutes, 10);
        assert_eq!(report.preparing_minutes, 0);
        assert_eq!(report.total_minutes, 10);
        assert_eq!(report.alert, WaitAlert::Normal);
        assert!(!report.is_high);
    }

    #[test]
    fn ready_order_splits_waiting_and_preparing() {
        let now = Utc::now();
        let report = wait_time(&order_at(40, Some(25), Some(5), now), now);
        assert_eq!(report.waiting_minutes, 15);
        assert_eq!(report.preparing_minutes, 20);
        assert_eq!(report.total_minutes, 40);
        assert_eq!(report.alert, WaitAlert::High);
        assert!(report.is_high);
    }
}
