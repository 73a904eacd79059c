//! Catalog management: categories and products.

use std::sync::Arc;

use tracing::info;

use super::ServiceError;
use crate::models::{Category, CategoryInput, Product, ProductInput, ProductWithCategory};
use crate::storage::{CatalogStore, ProductFilter};
use crate::validation;

/// CRUD over the catalog with input validation and not-found mapping.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, ServiceError> {
        self.store
            .get_category(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("category", id))
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, ServiceError> {
        validation::validate_category(&input)?;
        let category = self.store.create_category(&input).await?;
        info!(category_id = category.id, "Category created");
        Ok(category)
    }

    pub async fn update_category(&self, id: i64, input: CategoryInput) -> Result<Category, ServiceError> {
        validation::validate_category(&input)?;
        self.store
            .update_category(id, &input)
            .await?
            .ok_or_else(|| ServiceError::not_found("category", id))
    }

    /// Delete a category. Its products are left in place.
    pub async fn delete_category(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.delete_category(id).await? {
            return Err(ServiceError::not_found("category", id));
        }
        info!(category_id = id, "Category deleted");
        Ok(())
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductWithCategory>, ServiceError> {
        Ok(self.store.list_products(filter).await?)
    }

    /// Products of an existing category.
    pub async fn list_products_in_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<ProductWithCategory>, ServiceError> {
        self.get_category(category_id).await?;
        self.list_products(&ProductFilter::by_category(category_id)).await
    }

    pub async fn get_product(&self, id: i64) -> Result<ProductWithCategory, ServiceError> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product, ServiceError> {
        validation::validate_product(&input)?;
        let product = self.store.create_product(&input).await?;
        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: i64, input: ProductInput) -> Result<Product, ServiceError> {
        validation::validate_product(&input)?;
        self.store
            .update_product(id, &input)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.delete_product(id).await? {
            return Err(ServiceError::not_found("product", id));
        }
        info!(product_id = id, "Product deleted");
        Ok(())
    }
}
