//! Application layer for the fast-food backend.
//!
//! Wires the domain model to persistence, the payment gateway and customer
//! notifications. Each service is a cheap `Clone` handle over shared
//! repositories and ports; [`AppServices`] builds a consistent set of them.

pub mod error;
pub mod ports;
pub mod services;

use std::sync::Arc;

pub use error::{Result, ServiceError};
pub use ports::{
    ChargeRequest, GatewayStatus, InMemoryPaymentGateway, LogNotifier, Notification, Notifier,
    PaymentGateway, RecordingNotifier,
};
pub use services::{
    CatalogService, CheckoutCustomer, CheckoutItem, CheckoutReceipt, CheckoutRequest,
    CheckoutService, CustomerService, CustomerUpdate, GatewayWebhook, NewCustomer, OrderService,
    PaymentService, PaymentStatusReport, ProductInput,
};
use store::{
    CustomerRepository, InMemoryCustomerRepository, InMemoryOrderRepository,
    InMemoryPaymentRepository, InMemoryProductRepository, OrderRepository, PaymentRepository,
    ProductRepository,
};

/// Repositories and ports shared by every service.
#[derive(Clone)]
pub struct Dependencies {
    pub products: Arc<dyn ProductRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
}

impl Dependencies {
    /// In-memory repositories around the given gateway and notifier.
    pub fn in_memory(gateway: Arc<dyn PaymentGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            products: Arc::new(InMemoryProductRepository::new()),
            customers: Arc::new(InMemoryCustomerRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new()),
            payments: Arc::new(InMemoryPaymentRepository::new()),
            gateway,
            notifier,
        }
    }
}

/// All services, built over one set of dependencies.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
    pub customers: CustomerService,
    pub orders: OrderService,
    pub payments: PaymentService,
    pub checkout: CheckoutService,
}

impl AppServices {
    pub fn new(deps: Dependencies) -> Self {
        let orders = OrderService::new(
            deps.orders.clone(),
            deps.products.clone(),
            deps.notifier.clone(),
        );
        Self {
            catalog: CatalogService::new(deps.products.clone(), deps.orders.clone()),
            customers: CustomerService::new(deps.customers.clone()),
            payments: PaymentService::new(
                deps.payments.clone(),
                orders.clone(),
                deps.gateway.clone(),
                deps.notifier.clone(),
            ),
            checkout: CheckoutService::new(
                deps.customers,
                deps.products,
                deps.orders,
                deps.payments,
                deps.gateway,
                deps.notifier,
            ),
            orders,
        }
    }
}
