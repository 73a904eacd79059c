//! Catalog records: categories and products.

use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Writable fields of a category (create and update payload).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryInput {
    pub fn into_category(self, id: i64) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

/// A sellable product.
///
/// `price` is in minor currency units. `stock` is signed: checkout may drive
/// it below zero unless the non-negative stock policy is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

/// Writable fields of a product (create and update payload).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductInput {
    pub category_id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

impl ProductInput {
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            category_id: self.category_id,
            name: self.name,
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Product joined with its category name.
///
/// `category_name` is `None` when the referenced category has been deleted;
/// category deletion does not cascade to products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
}
