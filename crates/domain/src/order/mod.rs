//! Order aggregate, its line items and status machine.

mod aggregate;
mod line_item;
mod status;

pub use aggregate::{CustomerRef, Order, OrderParts};
pub use line_item::{LineItem, LineItemParts};
pub use status::OrderStatus;
