//! Order line items.

use common::{LineItemId, ProductId};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::entity::Entity;
use crate::error::{DomainError, Result};
use crate::value_objects::Money;

const MIN_QUANTITY: u32 = 1;
const MAX_QUANTITY: u32 = 99;
const MAX_NOTES_LEN: usize = 200;

/// One product, quantity and price entry within an order.
///
/// The unit price is captured when the line is created; later catalog price
/// changes do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    unit_price: Money,
    notes: Option<String>,
}

/// Stored representation of a line item.
#[derive(Debug, Clone)]
pub struct LineItemParts {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub notes: Option<String>,
}

impl LineItem {
    /// Creates a line for `quantity` units of `product` at its current price.
    ///
    /// The product must be available at this moment; later deactivation does
    /// not invalidate the line.
    pub fn new(product: &Product, quantity: u32, notes: Option<&str>) -> Result<Self> {
        if !product.can_be_sold() {
            return Err(DomainError::illegal(format!(
                "Product is not available for sale: {}",
                product.name()
            )));
        }
        validate_quantity(quantity)?;
        let notes = validate_notes(notes)?;

        Ok(Self {
            id: LineItemId::new(),
            product_id: product.id(),
            product_name: product.name().to_string(),
            quantity,
            unit_price: product.price(),
            notes,
        })
    }

    /// Rebuilds a line item from its stored parts.
    pub fn restore(parts: LineItemParts) -> Result<Self> {
        validate_quantity(parts.quantity)?;
        let unit_price = Money::price(parts.unit_price.amount())?;
        Ok(Self {
            id: parts.id,
            product_id: parts.product_id,
            product_name: parts.product_name,
            quantity: parts.quantity,
            unit_price,
            notes: validate_notes(parts.notes.as_deref())?,
        })
    }

    /// Unit price times quantity.
    pub fn total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Replaces the quantity, re-checking the 1 to 99 range.
    pub fn update_quantity(&mut self, quantity: u32) -> Result<()> {
        validate_quantity(quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

fn validate_quantity(quantity: u32) -> Result<()> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return Err(DomainError::validation(format!(
            "Quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

fn validate_notes(notes: Option<&str>) -> Result<Option<String>> {
    match notes.map(str::trim).filter(|n| !n.is_empty()) {
        None => Ok(None),
        Some(n) if n.chars().count() > MAX_NOTES_LEN => Err(DomainError::validation(format!(
            "Item notes cannot exceed {MAX_NOTES_LEN} characters"
        ))),
        Some(n) => Ok(Some(n.to_string())),
    }
}
