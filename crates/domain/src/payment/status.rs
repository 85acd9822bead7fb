//! Payment status machine and gateway status mapping.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::StatusMachine;
use crate::error::DomainError;

/// The status of a payment.
///
/// ```text
/// Pending ──► Processing ──► Approved ──► Refunded
///    │            │
///    │            ├──► Rejected
///    └────────────┴──► Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Approved,
    Rejected,
    Canceled,
    Refunded,
}

impl StatusMachine for PaymentStatus {
    const ENTITY: &'static str = "payment";

    fn all() -> &'static [Self] {
        &[
            PaymentStatus::Pending,
            PaymentStatus::Processing,
            PaymentStatus::Approved,
            PaymentStatus::Rejected,
            PaymentStatus::Canceled,
            PaymentStatus::Refunded,
        ]
    }

    fn allowed_next(self) -> &'static [Self] {
        match self {
            PaymentStatus::Pending => &[PaymentStatus::Processing, PaymentStatus::Canceled],
            PaymentStatus::Processing => &[
                PaymentStatus::Approved,
                PaymentStatus::Rejected,
                PaymentStatus::Canceled,
            ],
            PaymentStatus::Approved => &[PaymentStatus::Refunded],
            PaymentStatus::Rejected | PaymentStatus::Canceled | PaymentStatus::Refunded => &[],
        }
    }
}

impl PaymentStatus {
    /// Maps a status string reported by the payment gateway.
    ///
    /// Unknown strings map to `Pending`; this never fails.
    pub fn from_gateway(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" => PaymentStatus::Approved,
            "rejected" | "cancelled" => PaymentStatus::Rejected,
            "pending" | "in_process" => PaymentStatus::Processing,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentStatus::Approved)
    }

    /// Rejected or canceled.
    pub fn is_denied(&self) -> bool {
        matches!(self, PaymentStatus::Rejected | PaymentStatus::Canceled)
    }

    /// Not yet decided by the gateway.
    pub fn is_pending(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Processing)
    }

    /// Returns true once the payment has been processed (approved, rejected,
    /// canceled or refunded).
    pub fn is_finalized(&self) -> bool {
        !self.is_pending()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Processing => "PROCESSING",
            PaymentStatus::Approved => "APPROVED",
            PaymentStatus::Rejected => "REJECTED",
            PaymentStatus::Canceled => "CANCELED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Processing => "Processing",
            PaymentStatus::Approved => "Approved",
            PaymentStatus::Rejected => "Rejected",
            PaymentStatus::Canceled => "Canceled",
            PaymentStatus::Refunded => "Refunded",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Payment awaiting processing",
            PaymentStatus::Processing => "Payment being processed by the gateway",
            PaymentStatus::Approved => "Payment approved",
            PaymentStatus::Rejected => "Payment rejected",
            PaymentStatus::Canceled => "Payment canceled",
            PaymentStatus::Refunded => "Payment refunded",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Invalid payment status: {s}. Valid statuses: PENDING, PROCESSING, APPROVED, REJECTED, CANCELED, REFUNDED"
                ))
            })
    }
}
