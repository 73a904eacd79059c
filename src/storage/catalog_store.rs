//! CatalogStore trait for category and product persistence.

use async_trait::async_trait;

use super::Result;
use crate::models::{Category, CategoryInput, Product, ProductInput, ProductWithCategory};

/// Optional filters for product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
    /// Only products assigned to this category.
    pub category_id: Option<i64>,
}

impl ProductFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            category_id: None,
        }
    }

    pub fn by_category(category_id: i64) -> Self {
        Self {
            name: None,
            category_id: Some(category_id),
        }
    }

    /// Whether `product` passes every filter that is set.
    pub fn matches(&self, product: &Product) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map(|needle| product.name.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(true);
        let category_ok = self
            .category_id
            .map(|id| product.category_id == id)
            .unwrap_or(true);
        name_ok && category_ok
    }
}

/// Storage interface for the product catalog.
///
/// Lookups return `None` and mutations return `None`/`false` for unknown ids;
/// turning that into a not-found error is the caller's business.
///
/// Implementations:
/// - `SqlCatalogStore<Sqlite>` / `SqlCatalogStore<Postgres>`
/// - `MockStore`: in-memory, for tests
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories ordered by id.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn get_category(&self, id: i64) -> Result<Option<Category>>;

    /// Insert a category and return it with its assigned id.
    async fn create_category(&self, input: &CategoryInput) -> Result<Category>;

    async fn update_category(&self, id: i64, input: &CategoryInput) -> Result<Option<Category>>;

    /// Returns whether a row was removed. Products keep their category id.
    async fn delete_category(&self, id: i64) -> Result<bool>;

    /// Products matching `filter`, ordered by id, joined with their category name.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductWithCategory>>;

    async fn get_product(&self, id: i64) -> Result<Option<ProductWithCategory>>;

    async fn create_product(&self, input: &ProductInput) -> Result<Product>;

    async fn update_product(&self, id: i64, input: &ProductInput) -> Result<Option<Product>>;

    async fn delete_product(&self, id: i64) -> Result<bool>;
}
