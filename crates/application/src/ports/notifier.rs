//! Notification port.
//!
//! Notifications are fire-and-forget: services log a failed notification
//! and carry on.

use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, PaymentId};
use domain::{Entity, Order, OrderStatus, Payment};
use tokio::sync::RwLock;

use crate::error::{Result, ServiceError};

/// Outbound notifications triggered by status changes.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn order_status_changed(&self, order: &Order, previous: OrderStatus) -> Result<()>;

    async fn order_ready(&self, order: &Order) -> Result<()>;

    async fn payment_approved(&self, payment: &Payment) -> Result<()>;

    async fn payment_rejected(&self, payment: &Payment) -> Result<()>;

    async fn kitchen_new_order(&self, order: &Order) -> Result<()>;
}

/// Notifier that only writes tracing events.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_status_changed(&self, order: &Order, previous: OrderStatus) -> Result<()> {
        tracing::info!(
            order_id = %order.id(),
            customer = %order.customer().email,
            from = %previous,
            to = %order.status(),
            "notify: order status changed"
        );
        Ok(())
    }

    async fn order_ready(&self, order: &Order) -> Result<()> {
        tracing::info!(
            order_id = %order.id(),
            customer = %order.customer().name,
            "notify: order ready for pickup"
        );
        Ok(())
    }

    async fn payment_approved(&self, payment: &Payment) -> Result<()> {
        tracing::info!(
            payment_id = %payment.id(),
            order_id = %payment.order_id(),
            value = %payment.value(),
            "notify: payment approved"
        );
        Ok(())
    }

    async fn payment_rejected(&self, payment: &Payment) -> Result<()> {
        tracing::info!(
            payment_id = %payment.id(),
            order_id = %payment.order_id(),
            reason = payment.reason().unwrap_or_default(),
            "notify: payment rejected"
        );
        Ok(())
    }

    async fn kitchen_new_order(&self, order: &Order) -> Result<()> {
        tracing::info!(
            order_id = %order.id(),
            items = %order.summary(),
            "notify: new order for the kitchen"
        );
        Ok(())
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    OrderStatusChanged {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
    OrderReady {
        order_id: OrderId,
    },
    PaymentApproved {
        payment_id: PaymentId,
        order_id: OrderId,
    },
    PaymentRejected {
        payment_id: PaymentId,
        order_id: OrderId,
    },
    KitchenNewOrder {
        order_id: OrderId,
    },
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<Notification>,
    failing: bool,
}

/// Notifier that keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<RwLock<RecordingState>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications sent so far, oldest first.
    pub async fn sent(&self) -> Vec<Notification> {
        self.state.read().await.sent.clone()
    }

    /// Makes every following notification fail without being recorded.
    pub async fn set_failing(&self, failing: bool) {
        self.state.write().await.failing = failing;
    }

    async fn record(&self, notification: Notification) -> Result<()> {
        let mut state = self.state.write().await;
        if state.failing {
            return Err(ServiceError::Notification(
                "notification channel down".to_string(),
            ));
        }
        state.sent.push(notification);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn order_status_changed(&self, order: &Order, previous: OrderStatus) -> Result<()> {
        self.record(Notification::OrderStatusChanged {
            order_id: order.id(),
            from: previous,
            to: order.status(),
        })
        .await
    }

    async fn order_ready(&self, order: &Order) -> Result<()> {
        self.record(Notification::OrderReady {
            order_id: order.id(),
        })
        .await
    }

    async fn payment_approved(&self, payment: &Payment) -> Result<()> {
        self.record(Notification::PaymentApproved {
            payment_id: payment.id(),
            order_id: payment.order_id(),
        })
        .await
    }

    async fn payment_rejected(&self, payment: &Payment) -> Result<()> {
        self.record(Notification::PaymentRejected {
            payment_id: payment.id(),
            order_id: payment.order_id(),
        })
        .await
    }

    async fn kitchen_new_order(&self, order: &Order) -> Result<()> {
        self.record(Notification::KitchenNewOrder {
            order_id: order.id(),
        })
        .await
    }
}

/// Logs a failed notification instead of propagating it.
pub(crate) fn log_failure(kind: &'static str, result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!(notification = kind, error = %e, "notification failed");
    }
}
