//! Catalog use cases.

use std::sync::Arc;

use common::ProductId;
use domain::{Category, DomainError, Product};
use projections::CategoryStatistics;
use rust_decimal::Decimal;
use store::{OrderRepository, ProductRepository};

use crate::error::{Result, ServiceError};

/// Fields of a product as entered by staff.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Category,
}

/// Product management.
///
/// Product names are unique across the catalog, compared case-insensitively.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { products, orders }
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> Result<Product> {
        if self.products.exists_by_name(&input.name).await? {
            return Err(DomainError::conflict(format!(
                "A product named '{}' already exists",
                input.name.trim()
            ))
            .into());
        }
        let product = Product::new(
            &input.name,
            input.description.as_deref(),
            input.price,
            input.category,
        )?;
        let product = self.products.save(product).await?;
        tracing::info!(product_id = %domain::Entity::id(&product), "product created");
        Ok(product)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.products.find_all().await?)
    }

    pub async fn list_by_category(&self, category: Category) -> Result<Vec<Product>> {
        Ok(self.products.find_by_category(category).await?)
    }

    /// Products that can be ordered, optionally within one category.
    pub async fn list_available(&self, category: Option<Category>) -> Result<Vec<Product>> {
        Ok(match category {
            Some(category) => self.products.find_available_by_category(category).await?,
            None => self.products.find_available().await?,
        })
    }

    pub async fn search(&self, name: &str) -> Result<Vec<Product>> {
        Ok(self.products.search_by_name(name).await?)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product> {
        let mut product = self.get(id).await?;
        if self
            .products
            .exists_by_name_excluding(&input.name, id)
            .await?
        {
            return Err(DomainError::conflict(format!(
                "A product named '{}' already exists",
                input.name.trim()
            ))
            .into());
        }
        product.update(
            &input.name,
            input.description.as_deref(),
            input.price,
            input.category,
        )?;
        Ok(self.products.save(product).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, id: ProductId) -> Result<Product> {
        let mut product = self.get(id).await?;
        product.activate();
        Ok(self.products.save(product).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn deactivate(&self, id: ProductId) -> Result<Product> {
        let mut product = self.get(id).await?;
        product.deactivate();
        Ok(self.products.save(product).await?)
    }

    /// Removes a product that no order has ever referenced.
    ///
    /// Products with order history can only be deactivated.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<()> {
        let product = self.get(id).await?;
        if self.orders.exists_with_product(id).await? {
            return Err(DomainError::illegal(format!(
                "Product '{}' is referenced by existing orders; deactivate it instead",
                product.name()
            ))
            .into());
        }
        if !self.products.delete(id).await? {
            return Err(ServiceError::not_found("Product", id));
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub fn categories(&self) -> &'static [Category] {
        Category::all()
    }

    /// Categories with at least one available product.
    pub async fn categories_with_products(&self) -> Result<Vec<Category>> {
        let available = self.products.find_available().await?;
        Ok(Category::all()
            .iter()
            .copied()
            .filter(|c| available.iter().any(|p| p.category() == *c))
            .collect())
    }

    pub async fn category_statistics(&self) -> Result<Vec<CategoryStatistics>> {
        let products = self.products.find_all().await?;
        let orders = self.orders.find_all().await?;
        Ok(projections::category_statistics(&products, &orders))
    }
}
