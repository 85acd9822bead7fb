//! Payment entity.

use chrono::{DateTime, Duration, Utc};
use common::{OrderId, PaymentId, Version};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, StatusMachine};
use crate::error::{DomainError, Result};
use crate::value_objects::Money;

use super::{PaymentMethod, PaymentStatus};

/// Data returned by the payment gateway when a charge is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationData {
    pub transaction_id: String,
    pub qr_code: Option<String>,
    pub payment_link: Option<String>,
}

/// The payment for one order.
///
/// The value is fixed at creation. `processed_at` is stamped the first time
/// the payment reaches a finalized status and never moves afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    #[serde(default)]
    version: Version,
    order_id: OrderId,
    method: PaymentMethod,
    status: PaymentStatus,
    value: Money,
    transaction_id: Option<String>,
    qr_code: Option<String>,
    payment_link: Option<String>,
    /// Rejection, cancellation or refund reason.
    reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

/// Stored representation of a payment.
#[derive(Debug, Clone)]
pub struct PaymentParts {
    pub id: PaymentId,
    pub version: Version,
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub value: Money,
    pub transaction_id: Option<String>,
    pub qr_code: Option<String>,
    pub payment_link: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Creates a pending payment for `order_id`.
    pub fn new(order_id: OrderId, method: PaymentMethod, value: Money) -> Result<Self> {
        if !value.is_positive() {
            return Err(DomainError::validation(
                "Payment value must be greater than zero",
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: PaymentId::new(),
            version: Version::initial(),
            order_id,
            method,
            status: PaymentStatus::Pending,
            value,
            transaction_id: None,
            qr_code: None,
            payment_link: None,
            reason: None,
            created_at: now,
            updated_at: now,
            processed_at: None,
        })
    }

    pub fn restore(parts: PaymentParts) -> Result<Self> {
        if !parts.value.is_positive() {
            return Err(DomainError::validation(
                "Payment value must be greater than zero",
            ));
        }
        Ok(Self {
            id: parts.id,
            version: parts.version,
            order_id: parts.order_id,
            method: parts.method,
            status: parts.status,
            value: parts.value,
            transaction_id: parts.transaction_id,
            qr_code: parts.qr_code,
            payment_link: parts.payment_link,
            reason: parts.reason,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            processed_at: parts.processed_at,
        })
    }

    // ========== Status transitions ==========

    /// Moves the payment to `next` through the transition table.
    pub fn transition_to(&mut self, next: PaymentStatus) -> Result<()> {
        self.status.validate_transition(next)?;

        let now = Utc::now();
        self.status = next;
        if next.is_finalized() && self.processed_at.is_none() {
            self.processed_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Hands the payment to the gateway.
    pub fn start_processing(&mut self, transaction_id: Option<&str>) -> Result<()> {
        self.status.validate_transition(PaymentStatus::Processing)?;
        self.set_transaction_id(transaction_id);
        self.transition_to(PaymentStatus::Processing)
    }

    pub fn approve(&mut self, transaction_id: Option<&str>) -> Result<()> {
        self.status.validate_transition(PaymentStatus::Approved)?;
        self.set_transaction_id(transaction_id);
        self.transition_to(PaymentStatus::Approved)
    }

    pub fn reject(&mut self, reason: &str) -> Result<()> {
        self.status.validate_transition(PaymentStatus::Rejected)?;
        self.set_reason(reason);
        self.transition_to(PaymentStatus::Rejected)
    }

    pub fn cancel(&mut self, reason: &str) -> Result<()> {
        self.status.validate_transition(PaymentStatus::Canceled)?;
        self.set_reason(reason);
        self.transition_to(PaymentStatus::Canceled)
    }

    /// Refunds an approved payment.
    pub fn refund(&mut self, reason: &str) -> Result<()> {
        if !self.status.is_approved() {
            return Err(DomainError::illegal(
                "Only approved payments can be refunded",
            ));
        }
        self.set_reason(reason);
        self.transition_to(PaymentStatus::Refunded)
    }

    /// Applies a status reported by the gateway.
    ///
    /// Returns the new status when a transition happened. A report that maps
    /// to `Pending`, or to `Processing` while already processing, changes
    /// nothing. Anything else must be a single legal step from the current
    /// status.
    pub fn apply_gateway_status(&mut self, raw: &str) -> Result<Option<PaymentStatus>> {
        let mapped = PaymentStatus::from_gateway(raw);
        match mapped {
            PaymentStatus::Pending => Ok(None),
            PaymentStatus::Processing if self.status == PaymentStatus::Processing => Ok(None),
            PaymentStatus::Refunded => {
                self.status.validate_transition(mapped)?;
                self.refund("Refunded by the payment gateway")?;
                Ok(Some(mapped))
            }
            PaymentStatus::Rejected => {
                self.reject(&format!("Gateway reported '{}'", raw.trim()))?;
                Ok(Some(mapped))
            }
            _ => {
                self.transition_to(mapped)?;
                Ok(Some(mapped))
            }
        }
    }

    /// Stores the gateway's transaction id, QR code and payment link.
    ///
    /// Does not change the status.
    pub fn attach_integration_data(&mut self, data: IntegrationData) {
        self.transaction_id = Some(data.transaction_id);
        self.qr_code = data.qr_code;
        self.payment_link = data.payment_link;
        self.touch();
    }

    // ========== Queries ==========

    pub fn is_approved(&self) -> bool {
        self.status.is_approved()
    }

    pub fn is_denied(&self) -> bool {
        self.status.is_denied()
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn is_finalized(&self) -> bool {
        self.status.is_finalized()
    }

    pub fn requires_integration(&self) -> bool {
        self.method.requires_integration()
    }

    pub fn has_qr_code(&self) -> bool {
        self.qr_code.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    pub fn has_payment_link(&self) -> bool {
        self.payment_link
            .as_deref()
            .is_some_and(|l| !l.trim().is_empty())
    }

    /// Time between creation and processing; `None` until processed.
    pub fn processing_time(&self) -> Option<Duration> {
        self.processed_at.map(|at| at - self.created_at)
    }

    pub fn processing_minutes(&self) -> Option<i64> {
        self.processing_time().map(|d| d.num_minutes())
    }

    /// Message shown to the customer for the current status.
    pub fn status_message(&self) -> String {
        let reason = self.reason.as_deref().unwrap_or("not informed");
        match self.status {
            PaymentStatus::Pending => "Payment awaiting processing".to_string(),
            PaymentStatus::Processing => "Payment is being processed".to_string(),
            PaymentStatus::Approved => "Payment approved".to_string(),
            PaymentStatus::Rejected => format!("Payment rejected: {reason}"),
            PaymentStatus::Canceled => format!("Payment canceled: {reason}"),
            PaymentStatus::Refunded => format!("Payment refunded: {reason}"),
        }
    }

    /// One-line description, e.g. `"Payment 1c2d... - PIX - 25.00 - PENDING"`.
    pub fn summary(&self) -> String {
        format!(
            "Payment {} - {} - {} - {}",
            self.id,
            self.method.display_name(),
            self.value,
            self.status
        )
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn value(&self) -> Money {
        self.value
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn qr_code(&self) -> Option<&str> {
        self.qr_code.as_deref()
    }

    pub fn payment_link(&self) -> Option<&str> {
        self.payment_link.as_deref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    fn set_transaction_id(&mut self, transaction_id: Option<&str>) {
        if let Some(tx) = transaction_id.map(str::trim).filter(|tx| !tx.is_empty()) {
            self.transaction_id = Some(tx.to_string());
        }
    }

    fn set_reason(&mut self, reason: &str) {
        let reason = reason.trim();
        self.reason = (!reason.is_empty()).then(|| reason.to_string());
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Payment {
    type Id = PaymentId;

    fn kind() -> &'static str {
        "Payment"
    }

    fn id(&self) -> PaymentId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}
