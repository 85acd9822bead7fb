//! Customer base statistics.

use domain::Customer;
use rust_decimal::Decimal;
use serde::Serialize;

use super::category_stats::percentage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStatistics {
    pub total: usize,
    /// Customers with at least one order.
    pub active: usize,
    pub inactive: usize,
    pub identified: usize,
    pub campaign_eligible: usize,
    pub active_percentage: Decimal,
    pub campaign_eligible_percentage: Decimal,
}

pub fn customer_statistics(customers: &[Customer]) -> CustomerStatistics {
    let total = customers.len();
    let active = customers.iter().filter(|c| c.is_active()).count();
    let identified = customers.iter().filter(|c| c.is_identified()).count();
    let campaign_eligible = customers.iter().filter(|c| c.is_campaign_eligible()).count();

    CustomerStatistics {
        total,
        active,
        inactive: total - active,
        identified,
        campaign_eligible,
        active_percentage: percentage(active, total),
        campaign_eligible_percentage: percentage(campaign_eligible, total),
    }
}
