//! Read model views.

pub mod category_stats;
pub mod customer_stats;
pub mod kitchen_queue;
pub mod wait_time;

pub use category_stats::{CategoryStatistics, category_statistics};
pub use customer_stats::{CustomerStatistics, customer_statistics};
pub use kitchen_queue::{KitchenTicket, kitchen_queue};
pub use wait_time::{WaitAlert, WaitTimeReport, wait_time};
