//! Payment methods.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Pix,
    CreditCard,
    DebitCard,
    Cash,
}

impl PaymentMethod {
    pub fn all() -> &'static [PaymentMethod] {
        &[
            PaymentMethod::Pix,
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Cash,
        ]
    }

    /// Returns true if the payment goes through the gateway.
    pub fn requires_integration(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }

    pub fn is_electronic(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }

    /// Settles at the counter or within seconds.
    pub fn is_instant(&self) -> bool {
        matches!(self, PaymentMethod::Pix | PaymentMethod::Cash)
    }

    /// Method code understood by the gateway; cash has none.
    pub fn gateway_code(&self) -> Option<&'static str> {
        match self {
            PaymentMethod::Pix => Some("pix"),
            PaymentMethod::CreditCard => Some("credit_card"),
            PaymentMethod::DebitCard => Some("debit_card"),
            PaymentMethod::Cash => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::Cash => "CASH",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::DebitCard => "Debit card",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(DomainError::validation("Payment method cannot be empty"));
        }
        Self::all()
            .iter()
            .copied()
            .find(|method| method.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Invalid payment method: {s}. Valid methods: PIX, CREDIT_CARD, DEBIT_CARD, CASH"
                ))
            })
    }
}
