//! Derived read models for the kitchen and back office.
//!
//! Every view here is a pure function of the entities it is given:
//! - [`kitchen_queue`] orders the active orders for the kitchen display
//! - [`wait_time`] reports how long one order has been waiting
//! - [`category_statistics`] summarizes the catalog and sales per category
//! - [`customer_statistics`] summarizes the customer base
//!
//! Nothing is cached; callers load the current entities and recompute.

pub mod views;

pub use views::{
    CategoryStatistics, CustomerStatistics, KitchenTicket, WaitAlert, WaitTimeReport,
    category_statistics, customer_statistics, kitchen_queue, wait_time,
};
