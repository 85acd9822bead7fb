//! Payment use cases and gateway webhook handling.

use std::sync::Arc;

use common::{OrderId, PaymentId};
use domain::{DomainError, Entity, OrderStatus, Payment, PaymentMethod, PaymentStatus};
use store::PaymentRepository;

use super::{OrderService, today};
use crate::error::{Result, ServiceError};
use crate::ports::notifier::log_failure;
use crate::ports::{Notifier, PaymentGateway};

/// Status change pushed by the payment gateway.
#[derive(Debug, Clone)]
pub struct GatewayWebhook {
    pub transaction_id: String,
    /// Raw gateway status (`approved`, `rejected`, `in_process`, ...).
    pub status: String,
}

/// Where the payment of an order stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStatusReport {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub approved: bool,
    pub message: String,
}

impl From<&Payment> for PaymentStatusReport {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.id(),
            order_id: payment.order_id(),
            status: payment.status(),
            approved: payment.is_approved(),
            message: payment.status_message(),
        }
    }
}

/// Payment queries, manual status changes and webhook processing.
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    orders: OrderService,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
}

impl PaymentService {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        orders: OrderService,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            payments,
            orders,
            gateway,
            notifier,
        }
    }

    // ========== Queries ==========

    pub async fn status_by_order(&self, order_id: OrderId) -> Result<PaymentStatusReport> {
        let payment = self.get_by_order(order_id).await?;
        Ok(PaymentStatusReport::from(&payment))
    }

    pub async fn get(&self, id: PaymentId) -> Result<Payment> {
        self.payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment", id))
    }

    pub async fn get_by_order(&self, order_id: OrderId) -> Result<Payment> {
        self.payments
            .find_by_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment for order", order_id))
    }

    pub async fn get_by_transaction(&self, transaction_id: &str) -> Result<Payment> {
        self.payments
            .find_by_transaction_id(transaction_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment", transaction_id))
    }

    pub async fn list(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.find_all().await?)
    }

    pub async fn list_by_status(&self, status: &str) -> Result<Vec<Payment>> {
        let status: PaymentStatus = status.parse()?;
        Ok(self.payments.find_by_status(status).await?)
    }

    pub async fn list_by_method(&self, method: &str) -> Result<Vec<Payment>> {
        let method: PaymentMethod = method.parse()?;
        Ok(self.payments.find_by_method(method).await?)
    }

    pub async fn approved(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.find_by_status(PaymentStatus::Approved).await?)
    }

    /// Payments still waiting on an outcome (PENDING or PROCESSING).
    pub async fn pending(&self) -> Result<Vec<Payment>> {
        let mut payments = self.payments.find_all().await?;
        payments.retain(Payment::is_pending);
        Ok(payments)
    }

    pub async fn today(&self) -> Result<Vec<Payment>> {
        let (from, to) = today();
        Ok(self.payments.find_created_between(from, to).await?)
    }

    // ========== Status changes ==========

    /// Approves a payment being processed.
    ///
    /// A pending payment without gateway integration (cash) is confirmed at
    /// the counter, so it goes through PROCESSING in the same call.
    #[tracing::instrument(skip(self))]
    pub async fn approve(&self, id: PaymentId, transaction_id: Option<String>) -> Result<Payment> {
        let mut payment = self.get(id).await?;
        if payment.status() == PaymentStatus::Pending && !payment.requires_integration() {
            payment.start_processing(transaction_id.as_deref())?;
        }
        payment.approve(transaction_id.as_deref())?;
        let payment = self.payments.save(payment).await?;
        self.after_transition(&payment).await;
        Ok(payment)
    }

    #[tracing::instrument(skip(self))]
    pub async fn reject(&self, id: PaymentId, reason: &str) -> Result<Payment> {
        let mut payment = self.get(id).await?;
        payment.reject(reason)?;
        let payment = self.payments.save(payment).await?;
        self.after_transition(&payment).await;
        Ok(payment)
    }

    /// Cancels a payment, voiding the gateway charge first when there is one.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, id: PaymentId, reason: &str) -> Result<Payment> {
        let current = self.get(id).await?;
        let mut updated = current.clone();
        updated.cancel(reason)?;

        if let Some(tx) = gateway_transaction(&current)
            && !self.gateway.cancel(tx).await?
        {
            return Err(ServiceError::Gateway(format!(
                "Gateway could not cancel transaction {tx}"
            )));
        }

        let payment = self.payments.save(updated).await?;
        self.after_transition(&payment).await;
        Ok(payment)
    }

    /// Refunds an approved payment, at the gateway first when there is a charge.
    #[tracing::instrument(skip(self))]
    pub async fn refund(&self, id: PaymentId, reason: &str) -> Result<Payment> {
        let current = self.get(id).await?;
        let mut updated = current.clone();
        updated.refund(reason)?;

        if let Some(tx) = gateway_transaction(&current)
            && !self.gateway.refund(tx, current.value()).await?
        {
            return Err(ServiceError::Gateway(format!(
                "Gateway could not refund transaction {tx}"
            )));
        }

        let payment = self.payments.save(updated).await?;
        self.after_transition(&payment).await;
        Ok(payment)
    }

    /// Applies a gateway webhook.
    ///
    /// The signature is checked against the raw `payload`. A report that
    /// maps to no change leaves the payment untouched and still succeeds.
    #[tracing::instrument(skip(self, webhook, payload, signature), fields(tx = %webhook.transaction_id, status = %webhook.status))]
    pub async fn handle_webhook(
        &self,
        webhook: &GatewayWebhook,
        payload: &str,
        signature: Option<&str>,
    ) -> Result<Payment> {
        let result = self.apply_webhook(webhook, payload, signature).await;
        let outcome = match &result {
            Ok((_, true)) => "applied",
            Ok((_, false)) => "ignored",
            Err(_) => "failed",
        };
        metrics::counter!("webhooks_total", "outcome" => outcome).increment(1);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "webhook rejected");
        }
        result.map(|(payment, _)| payment)
    }

    async fn apply_webhook(
        &self,
        webhook: &GatewayWebhook,
        payload: &str,
        signature: Option<&str>,
    ) -> Result<(Payment, bool)> {
        if !self
            .gateway
            .verify_webhook_signature(payload, signature.unwrap_or_default())
        {
            return Err(DomainError::validation("Invalid webhook signature").into());
        }
        let transaction_id = webhook.transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(DomainError::validation("Webhook without transaction id").into());
        }

        let mut payment = self.get_by_transaction(transaction_id).await?;
        match payment.apply_gateway_status(&webhook.status)? {
            None => {
                tracing::info!(payment_id = %payment.id(), "webhook left payment unchanged");
                Ok((payment, false))
            }
            Some(_) => {
                let payment = self.payments.save(payment).await?;
                self.after_transition(&payment).await;
                Ok((payment, true))
            }
        }
    }

    /// Metrics, notifications and order progression after a saved status change.
    async fn after_transition(&self, payment: &Payment) {
        let status = payment.status();
        metrics::counter!("payment_transitions_total", "to" => status.as_str()).increment(1);
        tracing::info!(
            payment_id = %payment.id(),
            order_id = %payment.order_id(),
            to = %status,
            "payment status changed"
        );

        match status {
            PaymentStatus::Approved => {
                log_failure(
                    "payment_approved",
                    self.notifier.payment_approved(payment).await,
                );
                self.send_to_kitchen(payment.order_id()).await;
            }
            PaymentStatus::Rejected => {
                log_failure(
                    "payment_rejected",
                    self.notifier.payment_rejected(payment).await,
                );
            }
            _ => {}
        }
    }

    /// Starts preparing a paid order that is still waiting in RECEIVED.
    async fn send_to_kitchen(&self, order_id: OrderId) {
        let result = match self.orders.get(order_id).await {
            Ok(order) if order.status() == OrderStatus::Received => self
                .orders
                .transition(order_id, OrderStatus::InPreparation)
                .await
                .map(|_| ()),
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::error!(%order_id, error = %e, "approved payment could not start its order");
        }
    }
}

/// Transaction id of a charge the gateway must be told about.
fn gateway_transaction(payment: &Payment) -> Option<&str> {
    payment
        .transaction_id()
        .filter(|_| payment.requires_integration())
}
