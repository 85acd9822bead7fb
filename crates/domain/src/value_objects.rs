//! Value objects shared by the domain entities.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Monetary amount with exact decimal arithmetic.
///
/// Wraps `rust_decimal::Decimal` so totals never accumulate floating point
/// drift. Serialized as a decimal string (e.g. `"59.97"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Highest accepted unit price, `99999.99`.
    ///
    /// Keeps every line total and order total far below `Decimal::MAX`, so
    /// the arithmetic below cannot overflow.
    pub const MAX_PRICE: Money = Money(Decimal::from_parts(9_999_999, 0, 0, false, 2));

    /// Wraps a decimal without validation.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parses a price: strictly positive, at most [`Money::MAX_PRICE`] and
    /// with at most two fractional digits.
    ///
    /// Trailing zeros are ignored, so `19.990` is accepted as `19.99`, while
    /// `19.999` is rejected instead of being rounded. The stored value always
    /// has a scale of two.
    pub fn price(amount: Decimal) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::validation("Price must be greater than zero"));
        }
        if amount > Self::MAX_PRICE.0 {
            return Err(DomainError::validation(format!(
                "Price cannot exceed {}",
                Self::MAX_PRICE
            )));
        }
        let mut normalized = amount.normalize();
        if normalized.scale() > 2 {
            return Err(DomainError::validation(
                "Price cannot have more than 2 decimal places",
            ));
        }
        normalized.rescale(2);
        Ok(Self(normalized))
    }

    /// Returns the underlying decimal.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Multiplies by a quantity.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }

    /// Rounds to two decimal places, midpoint away from zero.
    pub fn round_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// Brazilian individual tax id (CPF), stored as its 11 canonical digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

impl TaxId {
    /// Parses a tax id, ignoring punctuation such as `.` and `-`.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation("Tax id cannot be empty"));
        }
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if !Self::is_valid(&digits) {
            return Err(DomainError::validation(format!("Invalid tax id: {raw}")));
        }
        Ok(Self(digits))
    }

    /// Checks an 11-digit sequence with the two-stage modulo-11 algorithm.
    ///
    /// Sequences made of one repeated digit are always rejected.
    pub fn is_valid(digits: &str) -> bool {
        let digits: Vec<u32> = match digits.chars().map(|c| c.to_digit(10)).collect() {
            Some(d) => d,
            None => return false,
        };
        if digits.len() != 11 {
            return false;
        }
        if digits.iter().all(|d| *d == digits[0]) {
            return false;
        }
        check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
    }

    /// Returns the 11 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the tax id in `XXX.XXX.XXX-XX` form.
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

fn check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    let digit = 11 - (sum % 11);
    if digit >= 10 { 0 } else { digit }
}

impl std::fmt::Display for TaxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl TryFrom<String> for TaxId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TaxId> for String {
    fn from(tax_id: TaxId) -> Self {
        tax_id.0
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses an email address, trimming and lower-casing it first.
    pub fn parse(raw: &str) -> Result<Self> {
        let cleaned = raw.trim().to_lowercase();
        if cleaned.is_empty() {
            return Err(DomainError::validation("Email cannot be empty"));
        }
        if !EMAIL_PATTERN.is_match(&cleaned) {
            return Err(DomainError::validation(format!("Invalid email: {raw}")));
        }
        Ok(Self(cleaned))
    }

    /// Returns the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
