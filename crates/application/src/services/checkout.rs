//! Checkout: turns a customer's cart into an order and its payment.

use std::sync::Arc;
use std::time::Instant;

use common::{OrderId, PaymentId, ProductId};
use domain::{
    Customer, DomainError, Email, Entity, LineItem, Money, Order, OrderStatus, Payment,
    PaymentMethod, PaymentStatus,
};
use store::{CustomerRepository, OrderRepository, PaymentRepository, ProductRepository};

use super::customers::parse_tax_id;
use crate::error::{Result, ServiceError};
use crate::ports::notifier::log_failure;
use crate::ports::{ChargeRequest, Notifier, PaymentGateway};

/// Who is buying. Matched to an existing customer by email, then tax id.
#[derive(Debug, Clone, Default)]
pub struct CheckoutCustomer {
    pub name: String,
    pub tax_id: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer: CheckoutCustomer,
    pub items: Vec<CheckoutItem>,
    /// Payment method code, parsed case-insensitively.
    pub payment_method: String,
}

/// Outcome of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub payment_id: PaymentId,
    pub payment_status: PaymentStatus,
    pub qr_code: Option<String>,
    pub payment_link: Option<String>,
    pub transaction_id: Option<String>,
    pub message: String,
}

/// Places orders.
///
/// A gateway failure does not fail the checkout: the order is kept and its
/// payment stays PENDING so it can be settled later.
#[derive(Clone)]
pub struct CheckoutService {
    customers: Arc<dyn CustomerRepository>,
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
}

impl CheckoutService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            customers,
            products,
            orders,
            payments,
            gateway,
            notifier,
        }
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.customer.email, method = %request.payment_method))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutReceipt> {
        let start = Instant::now();
        metrics::counter!("checkouts_total").increment(1);

        let method = validate(&request)?;
        let mut customer = self.find_or_build_customer(&request.customer).await?;
        let lines = self.resolve_items(&request.items).await?;

        let order = Order::place(&customer, lines)?;
        customer.record_order();
        self.customers.save(customer).await?;
        let order = self.orders.save(order).await?;

        let mut payment = Payment::new(order.id(), method, order.total())?;
        let message = if method.requires_integration() {
            self.charge(&order, &mut payment).await?
        } else {
            "Order received. Pay at the counter to confirm it.".to_string()
        };
        let payment = self.payments.save(payment).await?;

        log_failure(
            "kitchen_new_order",
            self.notifier.kitchen_new_order(&order).await,
        );

        let duration = start.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        tracing::info!(
            order_id = %order.id(),
            payment_id = %payment.id(),
            total = %order.total(),
            payment_status = %payment.status(),
            duration,
            "checkout completed"
        );

        Ok(CheckoutReceipt {
            order_id: order.id(),
            status: order.status(),
            total: order.total(),
            payment_method: method,
            payment_id: payment.id(),
            payment_status: payment.status(),
            qr_code: payment.qr_code().map(String::from),
            payment_link: payment.payment_link().map(String::from),
            transaction_id: payment.transaction_id().map(String::from),
            message,
        })
    }

    /// Existing customer by email, then by tax id, else a new unsaved one.
    async fn find_or_build_customer(&self, input: &CheckoutCustomer) -> Result<Customer> {
        let email = Email::parse(&input.email)?;
        if let Some(customer) = self.customers.find_by_email(&email).await? {
            return Ok(customer);
        }

        let tax_id = parse_tax_id(input.tax_id.as_deref())?;
        if let Some(tax_id) = &tax_id
            && let Some(customer) = self.customers.find_by_tax_id(tax_id).await?
        {
            return Ok(customer);
        }

        let customer = Customer::new(&input.name, tax_id, email, None, false)?;
        tracing::info!(customer_id = %customer.id(), "registering customer at checkout");
        Ok(customer)
    }

    async fn resolve_items(&self, items: &[CheckoutItem]) -> Result<Vec<LineItem>> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self
                .products
                .find_by_id(item.product_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Product", item.product_id))?;
            lines.push(LineItem::new(
                &product,
                item.quantity,
                item.notes.as_deref(),
            )?);
        }
        Ok(lines)
    }

    /// Creates the gateway charge and moves the payment to PROCESSING.
    ///
    /// Returns the message for the customer.
    async fn charge(&self, order: &Order, payment: &mut Payment) -> Result<String> {
        let request = ChargeRequest {
            order_id: order.id(),
            amount: order.total(),
            method: payment.method(),
            description: format!("Order {}", order.id()),
        };

        match self.gateway.create_payment(request).await {
            Ok(data) => {
                let transaction_id = data.transaction_id.clone();
                payment.attach_integration_data(data);
                payment.start_processing(Some(&transaction_id))?;
                metrics::counter!("payment_transitions_total", "to" => PaymentStatus::Processing.as_str())
                    .increment(1);
                Ok(match payment.method() {
                    PaymentMethod::Pix => "Order received. Scan the QR code to pay with PIX.",
                    _ => "Order received. Use the payment link to complete the payment.",
                }
                .to_string())
            }
            Err(e) => {
                tracing::warn!(order_id = %order.id(), error = %e, "gateway charge failed, payment left pending");
                Ok("Order received. The payment gateway is unavailable; the payment is pending."
                    .to_string())
            }
        }
    }
}

fn validate(request: &CheckoutRequest) -> Result<PaymentMethod> {
    if request.items.is_empty() {
        return Err(DomainError::validation("Order must contain at least one item").into());
    }
    if let Some(item) = request
        .items
        .iter()
        .find(|item| !(1..=99).contains(&item.quantity))
    {
        return Err(DomainError::validation(format!(
            "Quantity must be between 1 and 99, got {}",
            item.quantity
        ))
        .into());
    }
    Ok(request.payment_method.parse()?)
}
