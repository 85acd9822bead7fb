//! Payment entity, methods and status machine.

mod aggregate;
mod method;
mod status;

pub use aggregate::{IntegrationData, Payment, PaymentParts};
pub use method::PaymentMethod;
pub use status::PaymentStatus;
