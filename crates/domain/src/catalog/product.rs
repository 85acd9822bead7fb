//! Product entity.

use chrono::{DateTime, Utc};
use common::{ProductId, Version};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, Result};
use crate::value_objects::Money;

use super::Category;

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// A sellable menu item.
///
/// Name uniqueness is a catalog concern and is not checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    #[serde(default)]
    version: Version,
    name: String,
    description: Option<String>,
    price: Money,
    category: Category,
    available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Stored representation of a product, used to rebuild it from persistence.
#[derive(Debug, Clone)]
pub struct ProductParts {
    pub id: ProductId,
    pub version: Version,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Category,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new, available product.
    pub fn new(
        name: &str,
        description: Option<&str>,
        price: Decimal,
        category: Category,
    ) -> Result<Self> {
        let name = validate_name(name)?;
        let description = validate_description(description)?;
        let price = Money::price(price)?;
        let now = Utc::now();

        Ok(Self {
            id: ProductId::new(),
            version: Version::initial(),
            name,
            description,
            price,
            category,
            available: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a product from its stored parts, re-checking field rules.
    pub fn restore(parts: ProductParts) -> Result<Self> {
        Ok(Self {
            id: parts.id,
            version: parts.version,
            name: validate_name(&parts.name)?,
            description: validate_description(parts.description.as_deref())?,
            price: Money::price(parts.price)?,
            category: parts.category,
            available: parts.available,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    /// Replaces name, description, price and category.
    ///
    /// All fields are validated before any is assigned, so a failed update
    /// leaves the product untouched.
    pub fn update(
        &mut self,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        category: Category,
    ) -> Result<()> {
        let name = validate_name(name)?;
        let description = validate_description(description)?;
        let price = Money::price(price)?;

        self.name = name;
        self.description = description;
        self.price = price;
        self.category = category;
        self.touch();
        Ok(())
    }

    /// Makes the product available for sale.
    pub fn activate(&mut self) {
        self.available = true;
        self.touch();
    }

    /// Withdraws the product from sale. Existing order lines are unaffected.
    pub fn deactivate(&mut self) {
        self.available = false;
        self.touch();
    }

    /// Returns true if the product can be attached to an order right now.
    pub fn can_be_sold(&self) -> bool {
        self.available
    }

    /// Price of `quantity` units at the current price.
    pub fn calculate_total(&self, quantity: u32) -> Result<Money> {
        if quantity == 0 {
            return Err(DomainError::validation("Quantity must be greater than zero"));
        }
        Ok(self.price.times(quantity))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_available(&self) -> bool {
        self.available
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

impl Entity for Product {
    type Id = ProductId;

    fn kind() -> &'static str {
        "Product"
    }

    fn id(&self) -> ProductId {
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
    if trimmed.is_empty() {
        return Err(DomainError::validation("Product name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Product name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_description(description: Option<&str>) -> Result<Option<String>> {
    match description.map(str::trim) {
        None => Ok(None),
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(DomainError::validation(
            format!("Product description cannot exceed {MAX_DESCRIPTION_LEN} characters"),
        )),
        Some(d) => Ok(Some(d.to_string())),
    }
}
