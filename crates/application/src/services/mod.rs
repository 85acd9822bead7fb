//! Use-case services.

mod catalog;
mod checkout;
mod customers;
mod orders;
mod payments;

pub use catalog::{CatalogService, ProductInput};
pub use checkout::{
    CheckoutCustomer, CheckoutItem, CheckoutReceipt, CheckoutRequest, CheckoutService,
};
pub use customers::{CustomerService, CustomerUpdate, NewCustomer};
pub use orders::OrderService;
pub use payments::{GatewayWebhook, PaymentService, PaymentStatusReport};

use chrono::{DateTime, NaiveTime, Utc};

/// Start of the current UTC day and now.
pub(crate) fn today() -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (midnight, now)
}
