//! Product categories.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Closed set of menu categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Burgers, sandwiches and similar.
    Snack,
    /// Fries, onion rings and similar.
    Side,
    /// Sodas, juices, water.
    Drink,
    /// Ice cream, pies, sweets.
    Dessert,
}

impl Category {
    /// Every category, in menu order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Snack,
            Category::Side,
            Category::Drink,
            Category::Dessert,
        ]
    }

    /// Returns the wire code (`SNACK`, `SIDE`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Snack => "SNACK",
            Category::Side => "SIDE",
            Category::Drink => "DRINK",
            Category::Dessert => "DESSERT",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Snack => "Snack",
            Category::Side => "Side",
            Category::Drink => "Drink",
            Category::Dessert => "Dessert",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Snack => "Burgers, sandwiches and similar",
            Category::Side => "Fries, onion rings and similar",
            Category::Drink => "Sodas, juices, water and similar",
            Category::Dessert => "Ice cream, pies, sweets and similar",
        }
    }

    fn valid_codes() -> String {
        Self::all()
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    /// Case-insensitive parse; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(DomainError::validation("Category cannot be empty"));
        }
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Invalid category: {s}. Valid categories: {}",
                    Self::valid_codes()
                ))
            })
    }
}
