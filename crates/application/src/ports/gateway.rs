//! Payment gateway port and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use domain::{IntegrationData, Money, PaymentMethod};
use tokio::sync::RwLock;

use super::signature::verify_webhook;
use crate::error::{Result, ServiceError};

/// Default base URL for card payment links.
pub const DEFAULT_LINK_BASE: &str = "https://pay.example.com/checkout";

/// A charge to be created at the gateway.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub order_id: OrderId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub description: String,
}

/// Status of a transaction as the gateway reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayStatus {
    /// Raw gateway status string (`approved`, `in_process`, ...).
    pub status: String,
    pub amount: Money,
    pub reason: Option<String>,
}

/// External payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a charge and returns its transaction id plus QR code or link.
    async fn create_payment(&self, request: ChargeRequest) -> Result<IntegrationData>;

    async fn query_status(&self, transaction_id: &str) -> Result<GatewayStatus>;

    /// Returns false if the gateway does not know the transaction.
    async fn cancel(&self, transaction_id: &str) -> Result<bool>;

    /// Returns false if the gateway does not know the transaction.
    async fn refund(&self, transaction_id: &str, amount: Money) -> Result<bool>;

    /// Checks the signature sent along with the raw webhook body.
    fn verify_webhook_signature(&self, payload: &str, signature: &str) -> bool;

    async fn is_available(&self) -> bool;
}

#[derive(Debug, Clone)]
struct Charge {
    amount: Money,
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    charges: HashMap<String, Charge>,
    next_id: u32,
    unavailable: bool,
}

/// In-memory payment gateway.
///
/// Issues sequential transaction ids (`TX-0001`, `TX-0002`, ...), a QR code
/// payload for PIX and a payment link for card methods. Tests can flip it
/// into an unavailable state and drive the status of any transaction.
#[derive(Debug, Clone)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
    link_base: String,
    webhook_secret: Option<String>,
}

impl Default for InMemoryPaymentGateway {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_BASE, None)
    }
}

impl InMemoryPaymentGateway {
    /// Creates a gateway issuing links under `link_base`.
    ///
    /// With a `webhook_secret`, webhooks must carry the HMAC-SHA256 of their
    /// body (see [`sign_webhook`](super::sign_webhook)); without one every
    /// signature is accepted.
    pub fn new(link_base: impl Into<String>, webhook_secret: Option<String>) -> Self {
        Self {
            state: Arc::default(),
            link_base: link_base.into().trim_end_matches('/').to_string(),
            webhook_secret,
        }
    }

    /// Makes every following call fail as if the gateway were down.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Overrides the status the gateway reports for `transaction_id`.
    pub async fn set_status(&self, transaction_id: &str, status: &str) {
        if let Some(charge) = self.state.write().await.charges.get_mut(transaction_id) {
            charge.status = status.to_string();
        }
    }

    /// Returns the number of charges created.
    pub async fn charge_count(&self) -> usize {
        self.state.read().await.charges.len()
    }

    fn ensure_available(state: &InMemoryGatewayState) -> Result<()> {
        if state.unavailable {
            return Err(ServiceError::Gateway(
                "Payment gateway unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_payment(&self, request: ChargeRequest) -> Result<IntegrationData> {
        let mut state = self.state.write().await;
        Self::ensure_available(&state)?;

        let Some(code) = request.method.gateway_code() else {
            return Err(ServiceError::Gateway(format!(
                "Method {} is not processed by the gateway",
                request.method
            )));
        };

        state.next_id += 1;
        let transaction_id = format!("TX-{:04}", state.next_id);
        state.charges.insert(
            transaction_id.clone(),
            Charge {
                amount: request.amount,
                status: "pending".to_string(),
                reason: None,
            },
        );
        tracing::info!(
            %transaction_id,
            order_id = %request.order_id,
            amount = %request.amount,
            method = code,
            "gateway charge created"
        );

        let (qr_code, payment_link) = match request.method {
            PaymentMethod::Pix => (
                Some(format!(
                    "PIX|{transaction_id}|{}|{}",
                    request.amount, request.description
                )),
                None,
            ),
            _ => (None, Some(format!("{}/{transaction_id}", self.link_base))),
        };

        Ok(IntegrationData {
            transaction_id,
            qr_code,
            payment_link,
        })
    }

    async fn query_status(&self, transaction_id: &str) -> Result<GatewayStatus> {
        let state = self.state.read().await;
        Self::ensure_available(&state)?;
        let charge = state.charges.get(transaction_id).ok_or_else(|| {
            ServiceError::Gateway(format!("Unknown transaction: {transaction_id}"))
        })?;
        Ok(GatewayStatus {
            status: charge.status.clone(),
            amount: charge.amount,
            reason: charge.reason.clone(),
        })
    }

    async fn cancel(&self, transaction_id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        Self::ensure_available(&state)?;
        Ok(match state.charges.get_mut(transaction_id) {
            Some(charge) => {
                charge.status = "cancelled".to_string();
                charge.reason = Some("Canceled by merchant".to_string());
                true
            }
            None => false,
        })
    }

    async fn refund(&self, transaction_id: &str, amount: Money) -> Result<bool> {
        let mut state = self.state.write().await;
        Self::ensure_available(&state)?;
        Ok(match state.charges.get_mut(transaction_id) {
            Some(charge) => {
                charge.status = "refunded".to_string();
                charge.reason = Some(format!("Refunded {amount}"));
                true
            }
            None => false,
        })
    }

    fn verify_webhook_signature(&self, payload: &str, signature: &str) -> bool {
        match &self.webhook_secret {
            Some(secret) => verify_webhook(secret, payload, signature),
            None => true,
        }
    }

    async fn is_available(&self) -> bool {
        !self.state.read().await.unavailable
    }
}
