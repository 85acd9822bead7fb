//! Per-category catalog and sales statistics.

use std::collections::HashMap;

use common::ProductId;
use domain::{Category, Entity, Money, Order, Product};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatistics {
    pub category: Category,
    pub display_name: &'static str,
    pub total_products: usize,
    pub available_products: usize,
    pub unavailable_products: usize,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    /// Rounded to cents.
    pub average_price: Option<Money>,
    pub units_sold: u32,
    pub revenue: Money,
    /// Percentage of all units sold, two decimal places.
    pub share_of_units: Decimal,
    /// 1 = most units sold. Ties keep category order.
    pub popularity_rank: usize,
}

/// Computes statistics for every category, in `Category::all()` order.
///
/// Sales are attributed through the products in the catalog. A product with
/// order history cannot be deleted, so every line finds its category.
pub fn category_statistics(products: &[Product], orders: &[Order]) -> Vec<CategoryStatistics> {
    let category_of: HashMap<ProductId, Category> =
        products.iter().map(|p| (p.id(), p.category())).collect();

    let mut units: HashMap<Category, u32> = HashMap::new();
    let mut revenue: HashMap<Category, Money> = HashMap::new();
    for item in orders.iter().flat_map(Order::items) {
        if let Some(&category) = category_of.get(&item.product_id()) {
            *units.entry(category).or_default() += item.quantity();
            *revenue.entry(category).or_default() += item.total();
        }
    }
    let total_units: u32 = units.values().sum();

    let mut ranking: Vec<Category> = Category::all().to_vec();
    ranking.sort_by_key(|c| std::cmp::Reverse(units.get(c).copied().unwrap_or(0)));

    Category::all()
        .iter()
        .map(|&category| {
            let in_category: Vec<&Product> =
                products.iter().filter(|p| p.category() == category).collect();
            let available = in_category.iter().filter(|p| p.is_available()).count();
            let prices: Vec<Money> = in_category.iter().map(|p| p.price()).collect();
            let sold = units.get(&category).copied().unwrap_or(0);

            CategoryStatistics {
                category,
                display_name: category.display_name(),
                total_products: in_category.len(),
                available_products: available,
                unavailable_products: in_category.len() - available,
                min_price: prices.iter().copied().min(),
                max_price: prices.iter().copied().max(),
                average_price: average(&prices),
                units_sold: sold,
                revenue: revenue.get(&category).copied().unwrap_or(Money::ZERO),
                share_of_units: percentage(sold as usize, total_units as usize),
                popularity_rank: ranking
                    .iter()
                    .position(|c| *c == category)
                    .map_or(0, |i| i + 1),
            }
        })
        .collect()
}

fn average(prices: &[Money]) -> Option<Money> {
    if prices.is_empty() {
        return None;
    }
    let sum: Money = prices.iter().copied().sum();
    Some(Money::new(sum.amount() / Decimal::from(prices.len())).round_cents())
}

/// `part / whole` as a percentage rounded to two places; zero when `whole` is zero.
pub(crate) fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
