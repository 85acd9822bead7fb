//! Order status machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::StatusMachine;
use crate::error::DomainError;

/// The status of an order in its lifecycle.
///
/// Status transitions (linear, no skips, no way back):
/// ```text
/// Received ──► InPreparation ──► Ready ──► Finalized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order was placed and awaits payment; items can still change.
    #[default]
    Received,

    /// Payment approved, the kitchen is preparing the order.
    InPreparation,

    /// Ready for pickup.
    Ready,

    /// Handed to the customer (terminal state).
    Finalized,
}

impl StatusMachine for OrderStatus {
    const ENTITY: &'static str = "order";

    fn all() -> &'static [Self] {
        &[
            OrderStatus::Received,
            OrderStatus::InPreparation,
            OrderStatus::Ready,
            OrderStatus::Finalized,
        ]
    }

    fn allowed_next(self) -> &'static [Self] {
        match self {
            OrderStatus::Received => &[OrderStatus::InPreparation],
            OrderStatus::InPreparation => &[OrderStatus::Ready],
            OrderStatus::Ready => &[OrderStatus::Finalized],
            OrderStatus::Finalized => &[],
        }
    }
}

impl OrderStatus {
    /// Returns true if line items can be added or removed in this status.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, OrderStatus::Received)
    }

    /// Returns true if the order still shows up on the kitchen display.
    pub fn is_visible_in_kitchen(&self) -> bool {
        !matches!(self, OrderStatus::Finalized)
    }

    /// Kitchen priority: lower number is served first.
    pub fn kitchen_priority(&self) -> u8 {
        match self {
            OrderStatus::Ready => 1,
            OrderStatus::InPreparation => 2,
            OrderStatus::Received => 3,
            OrderStatus::Finalized => 4,
        }
    }

    /// Statuses reachable in one step.
    pub fn next_statuses(&self) -> &'static [OrderStatus] {
        self.allowed_next()
    }

    /// Returns the wire code (`RECEIVED`, `IN_PREPARATION`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "RECEIVED",
            OrderStatus::InPreparation => "IN_PREPARATION",
            OrderStatus::Ready => "READY",
            OrderStatus::Finalized => "FINALIZED",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Received => "Received",
            OrderStatus::InPreparation => "In preparation",
            OrderStatus::Ready => "Ready",
            OrderStatus::Finalized => "Finalized",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(DomainError::validation("Order status cannot be empty"));
        }
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Invalid order status: {s}. Valid statuses: RECEIVED, IN_PREPARATION, READY, FINALIZED"
                ))
            })
    }
}
