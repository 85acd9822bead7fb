//! Customer use cases.

use std::sync::Arc;

use common::CustomerId;
use domain::{Customer, DomainError, Email, Entity, TaxId};
use projections::CustomerStatistics;
use store::CustomerRepository;

use crate::error::{Result, ServiceError};

/// Registration data.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub tax_id: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub accepts_marketing: bool,
}

/// Editable customer fields. The tax id cannot change.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub accepts_marketing: bool,
}

/// Parses an optional tax id, treating a blank one as absent.
pub(crate) fn parse_tax_id(raw: Option<&str>) -> Result<Option<TaxId>> {
    match raw.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => Ok(Some(TaxId::parse(t)?)),
        None => Ok(None),
    }
}

/// Customer registration and lookup.
///
/// Email and tax id are each unique across customers.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    #[tracing::instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: NewCustomer) -> Result<Customer> {
        let email = Email::parse(&input.email)?;
        let tax_id = parse_tax_id(input.tax_id.as_deref())?;

        if let Some(tax_id) = &tax_id
            && self.customers.exists_by_tax_id(tax_id).await?
        {
            return Err(DomainError::conflict(format!(
                "A customer with tax id {} already exists",
                tax_id.formatted()
            ))
            .into());
        }
        if self.customers.exists_by_email(&email).await? {
            return Err(DomainError::conflict(format!(
                "A customer with email {email} already exists"
            ))
            .into());
        }

        let customer = Customer::new(
            &input.name,
            tax_id,
            email,
            input.phone.as_deref(),
            input.accepts_marketing,
        )?;
        let customer = self.customers.save(customer).await?;
        tracing::info!(customer_id = %customer.id(), "customer registered");
        Ok(customer)
    }

    pub async fn get(&self, id: CustomerId) -> Result<Customer> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", id))
    }

    pub async fn get_by_tax_id(&self, raw: &str) -> Result<Customer> {
        let tax_id = TaxId::parse(raw)?;
        self.customers
            .find_by_tax_id(&tax_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", tax_id.formatted()))
    }

    pub async fn get_by_email(&self, raw: &str) -> Result<Customer> {
        let email = Email::parse(raw)?;
        self.customers
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", email))
    }

    pub async fn list(&self) -> Result<Vec<Customer>> {
        Ok(self.customers.find_all().await?)
    }

    /// Customers who placed at least one order.
    pub async fn list_active(&self) -> Result<Vec<Customer>> {
        let mut customers = self.customers.find_all().await?;
        customers.retain(Customer::is_active);
        Ok(customers)
    }

    pub async fn search(&self, name: &str) -> Result<Vec<Customer>> {
        Ok(self.customers.search_by_name(name).await?)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: CustomerId, input: CustomerUpdate) -> Result<Customer> {
        let mut customer = self.get(id).await?;
        let email = Email::parse(&input.email)?;

        if &email != customer.email()
            && let Some(other) = self.customers.find_by_email(&email).await?
            && other.id() != id
        {
            return Err(DomainError::conflict(format!(
                "A customer with email {email} already exists"
            ))
            .into());
        }

        customer.update(
            &input.name,
            email,
            input.phone.as_deref(),
            input.accepts_marketing,
        )?;
        Ok(self.customers.save(customer).await?)
    }

    pub async fn enable(&self, id: CustomerId) -> Result<Customer> {
        let mut customer = self.get(id).await?;
        customer.enable();
        Ok(self.customers.save(customer).await?)
    }

    pub async fn disable(&self, id: CustomerId) -> Result<Customer> {
        let mut customer = self.get(id).await?;
        customer.disable();
        Ok(self.customers.save(customer).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<()> {
        if !self.customers.delete(id).await? {
            return Err(ServiceError::not_found("Customer", id));
        }
        Ok(())
    }

    /// Customers who may receive marketing campaigns.
    pub async fn campaign_audience(&self) -> Result<Vec<Customer>> {
        let mut customers = self.customers.find_all().await?;
        customers.retain(Customer::is_campaign_eligible);
        Ok(customers)
    }

    pub async fn statistics(&self) -> Result<CustomerStatistics> {
        let customers = self.customers.find_all().await?;
        Ok(projections::customer_statistics(&customers))
    }
}
