//! Ports to the outside world: the payment gateway and notifications.

pub mod gateway;
pub mod notifier;
pub mod signature;

pub use gateway::{
    ChargeRequest, DEFAULT_LINK_BASE, GatewayStatus, InMemoryPaymentGateway, PaymentGateway,
};
pub use notifier::{LogNotifier, Notification, Notifier, RecordingNotifier};
pub use signature::{sign_webhook, verify_webhook};
