//! Customer entity.

use chrono::{DateTime, Utc};
use common::{CustomerId, Version};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, Result};
use crate::value_objects::{Email, TaxId};

const MIN_NAME_LEN: usize = 2;
const MAX_NAME_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;

/// A registered customer.
///
/// `enabled` is the soft-delete flag toggled by staff; "active" in the
/// business sense means the customer has placed at least one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    #[serde(default)]
    version: Version,
    name: String,
    tax_id: Option<TaxId>,
    email: Email,
    phone: Option<String>,
    enabled: bool,
    accepts_marketing: bool,
    total_orders: u32,
    last_order_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Stored representation of a customer.
#[derive(Debug, Clone)]
pub struct CustomerParts {
    pub id: CustomerId,
    pub version: Version,
    pub name: String,
    pub tax_id: Option<TaxId>,
    pub email: Email,
    pub phone: Option<String>,
    pub enabled: bool,
    pub accepts_marketing: bool,
    pub total_orders: u32,
    pub last_order_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Registers a new customer.
    pub fn new(
        name: &str,
        tax_id: Option<TaxId>,
        email: Email,
        phone: Option<&str>,
        accepts_marketing: bool,
    ) -> Result<Self> {
        let name = validate_name(name)?;
        let phone = validate_phone(phone)?;
        let now = Utc::now();

        Ok(Self {
            id: CustomerId::new(),
            version: Version::initial(),
            name,
            tax_id,
            email,
            phone,
            enabled: true,
            accepts_marketing,
            total_orders: 0,
            last_order_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a customer from its stored parts.
    pub fn restore(parts: CustomerParts) -> Result<Self> {
        Ok(Self {
            id: parts.id,
            version: parts.version,
            name: validate_name(&parts.name)?,
            tax_id: parts.tax_id,
            email: parts.email,
            phone: validate_phone(parts.phone.as_deref())?,
            enabled: parts.enabled,
            accepts_marketing: parts.accepts_marketing,
            total_orders: parts.total_orders,
            last_order_at: parts.last_order_at,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    /// Updates contact details and marketing preference. Tax id never changes.
    pub fn update(
        &mut self,
        name: &str,
        email: Email,
        phone: Option<&str>,
        accepts_marketing: bool,
    ) -> Result<()> {
        let name = validate_name(name)?;
        let phone = validate_phone(phone)?;

        self.name = name;
        self.email = email;
        self.phone = phone;
        self.accepts_marketing = accepts_marketing;
        self.touch();
        Ok(())
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.touch();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.touch();
    }

    /// Counts a new order and stamps the last-order time.
    ///
    /// This is the only way the order counter changes; it is never decremented.
    pub fn record_order(&mut self) {
        self.total_orders += 1;
        let now = Utc::now();
        self.last_order_at = Some(now);
        self.updated_at = now;
    }

    /// Returns true if the customer carries a valid tax id.
    pub fn is_identified(&self) -> bool {
        self.tax_id.is_some()
    }

    /// Returns true if marketing campaigns may target this customer.
    pub fn is_campaign_eligible(&self) -> bool {
        // email is mandatory, so only the two flags can fail
        self.enabled && self.accepts_marketing
    }

    /// Returns true if the customer has placed at least one order.
    pub fn is_active(&self) -> bool {
        self.total_orders > 0
    }

    /// Returns true if both records describe the same person.
    ///
    /// Matches on id, then on email, then on tax id when both carry one.
    pub fn is_same_customer(&self, other: &Customer) -> bool {
        if self.id == other.id || self.email == other.email {
            return true;
        }
        matches!((&self.tax_id, &other.tax_id), (Some(a), Some(b)) if a == b)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tax_id(&self) -> Option<&TaxId> {
        self.tax_id.as_ref()
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn accepts_marketing(&self) -> bool {
        self.accepts_marketing
    }

    pub fn total_orders(&self) -> u32 {
        self.total_orders
    }

    pub fn last_order_at(&self) -> Option<DateTime<Utc>> {
        self.last_order_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn kind() -> &'static str {
        "Customer"
    }

    fn id(&self) -> CustomerId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < MIN_NAME_LEN || len > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Customer name must have between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_phone(phone: Option<&str>) -> Result<Option<String>> {
    match phone.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(p) if p.chars().count() > MAX_PHONE_LEN => Err(DomainError::validation(format!(
            "Phone cannot exceed {MAX_PHONE_LEN} characters"
        ))),
        Some(p) => Ok(Some(p.to_string())),
    }
}
