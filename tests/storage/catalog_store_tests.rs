//! CatalogStore interface tests.
//!
//! These tests verify the contract of the CatalogStore trait.
//! Each storage implementation should run these tests.

use kasir::models::{CategoryInput, ProductInput};
use kasir::storage::{CatalogStore, ProductFilter};

pub fn make_category(name: &str) -> CategoryInput {
    CategoryInput {
        name: name.to_string(),
        description: format!("{} description", name),
    }
}

pub fn make_product(category_id: i64, name: &str, price: i64, stock: i64) -> ProductInput {
    ProductInput {
        category_id,
        name: name.to_string(),
        price,
        stock,
    }
}

// =============================================================================
// Categories
// =============================================================================

pub async fn test_category_create_and_get<S: CatalogStore + ?Sized>(store: &S) {
    let created = store
        .create_category(&make_category("test_cat_create"))
        .await
        .expect("create should succeed");
    assert!(created.id > 0, "assigned id should be positive");

    let fetched = store
        .get_category(created.id)
        .await
        .expect("get should succeed")
        .expect("category should exist");
    assert_eq!(fetched, created);
}

pub async fn test_category_ids_are_distinct<S: CatalogStore + ?Sized>(store: &S) {
    let a = store
        .create_category(&make_category("test_cat_a"))
        .await
        .expect("create should succeed");
    let b = store
        .create_category(&make_category("test_cat_b"))
        .await
        .expect("create should succeed");
    assert_ne!(a.id, b.id);

    let all = store.list_categories().await.expect("list should succeed");
    assert!(all.iter().any(|c| c.id == a.id));
    assert!(all.iter().any(|c| c.id == b.id));
}

pub async fn test_category_update<S: CatalogStore + ?Sized>(store: &S) {
    let created = store
        .create_category(&make_category("test_cat_update"))
        .await
        .expect("create should succeed");

    let updated = store
        .update_category(created.id, &make_category("test_cat_renamed"))
        .await
        .expect("update should succeed")
        .expect("category should exist");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "test_cat_renamed");

    let missing = store
        .update_category(i64::MAX, &make_category("nobody"))
        .await
        .expect("update should succeed");
    assert!(missing.is_none(), "updating a missing category yields None");
}

pub async fn test_category_delete<S: CatalogStore + ?Sized>(store: &S) {
    let created = store
        .create_category(&make_category("test_cat_delete"))
        .await
        .expect("create should succeed");

    assert!(store.delete_category(created.id).await.expect("delete should succeed"));
    assert!(!store.delete_category(created.id).await.expect("delete should succeed"));
    assert!(store
        .get_category(created.id)
        .await
        .expect("get should succeed")
        .is_none());
}

// =============================================================================
// Products
// =============================================================================

pub async fn test_product_create_and_get<S: CatalogStore + ?Sized>(store: &S) {
    let category = store
        .create_category(&make_category("test_prod_cat"))
        .await
        .expect("create should succeed");
    let product = store
        .create_product(&make_product(category.id, "test_prod_kopi", 5000, 7))
        .await
        .expect("create should succeed");

    let fetched = store
        .get_product(product.id)
        .await
        .expect("get should succeed")
        .expect("product should exist");
    assert_eq!(fetched.product, product);
    assert_eq!(fetched.category_name.as_deref(), Some("test_prod_cat"));
}

pub async fn test_product_update<S: CatalogStore + ?Sized>(store: &S) {
    let product = store
        .create_product(&make_product(1, "test_prod_update", 1000, 1))
        .await
        .expect("create should succeed");

    let updated = store
        .update_product(product.id, &make_product(1, "test_prod_updated", 1500, 4))
        .await
        .expect("update should succeed")
        .expect("product should exist");
    assert_eq!(updated.price, 1500);
    assert_eq!(updated.stock, 4);

    assert!(store
        .update_product(i64::MAX, &make_product(1, "nobody", 1, 1))
        .await
        .expect("update should succeed")
        .is_none());
}

pub async fn test_product_delete<S: CatalogStore + ?Sized>(store: &S) {
    let product = store
        .create_product(&make_product(1, "test_prod_delete", 1000, 1))
        .await
        .expect("create should succeed");

    assert!(store.delete_product(product.id).await.expect("delete should succeed"));
    assert!(!store.delete_product(product.id).await.expect("delete should succeed"));
}

pub async fn test_product_survives_category_delete<S: CatalogStore + ?Sized>(store: &S) {
    let category = store
        .create_category(&make_category("test_orphan_cat"))
        .await
        .expect("create should succeed");
    let product = store
        .create_product(&make_product(category.id, "test_orphan_prod", 1000, 1))
        .await
        .expect("create should succeed");

    store
        .delete_category(category.id)
        .await
        .expect("delete should succeed");

    let fetched = store
        .get_product(product.id)
        .await
        .expect("get should succeed")
        .expect("product should survive category delete");
    assert_eq!(fetched.product.category_id, category.id);
    assert!(fetched.category_name.is_none());
}

pub async fn test_product_filters<S: CatalogStore + ?Sized>(store: &S) {
    let drinks = store
        .create_category(&make_category("test_filter_drinks"))
        .await
        .expect("create should succeed");
    let food = store
        .create_category(&make_category("test_filter_food"))
        .await
        .expect("create should succeed");
    store
        .create_product(&make_product(drinks.id, "Test_Filter Kopi Susu", 5000, 1))
        .await
        .expect("create should succeed");
    store
        .create_product(&make_product(drinks.id, "test_filter teh", 3000, 1))
        .await
        .expect("create should succeed");
    store
        .create_product(&make_product(food.id, "test_filter roti", 8000, 1))
        .await
        .expect("create should succeed");

    let by_name = store
        .list_products(&ProductFilter::by_name("KOPI SUSU"))
        .await
        .expect("list should succeed");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].product.name, "Test_Filter Kopi Susu");

    let by_category = store
        .list_products(&ProductFilter::by_category(drinks.id))
        .await
        .expect("list should succeed");
    assert_eq!(by_category.len(), 2);
    assert!(by_category.windows(2).all(|w| w[0].product.id < w[1].product.id));

    let both = store
        .list_products(&ProductFilter {
            name: Some("test_filter".to_string()),
            category_id: Some(food.id),
        })
        .await
        .expect("list should succeed");
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].product.name, "test_filter roti");
}

pub async fn test_product_name_search_is_literal<S: CatalogStore + ?Sized>(store: &S) {
    store
        .create_product(&make_product(1, "test_literal Diskon 50% Kopi", 2500, 1))
        .await
        .expect("create should succeed");

    let percent = store
        .list_products(&ProductFilter::by_name("%"))
        .await
        .expect("list should succeed");
    assert_eq!(percent.len(), 1, "'%' must match only names containing it");
    assert_eq!(percent[0].product.name, "test_literal Diskon 50% Kopi");

    let underscore = store
        .list_products(&ProductFilter::by_name("t_st"))
        .await
        .expect("list should succeed");
    assert!(underscore.is_empty(), "'_' must not match any single character");
}

/// Run all CatalogStore tests against a store implementation.
#[macro_export]
macro_rules! run_catalog_store_tests {
    ($store:expr) => {
        use $crate::storage::catalog_store_tests::*;

        test_category_create_and_get($store).await;
        println!("  test_category_create_and_get: PASSED");

        test_category_ids_are_distinct($store).await;
        println!("  test_category_ids_are_distinct: PASSED");

        test_category_update($store).await;
        println!("  test_category_update: PASSED");

        test_category_delete($store).await;
        println!("  test_category_delete: PASSED");

        test_product_create_and_get($store).await;
        println!("  test_product_create_and_get: PASSED");

        test_product_update($store).await;
        println!("  test_product_update: PASSED");

        test_product_delete($store).await;
        println!("  test_product_delete: PASSED");

        test_product_survives_category_delete($store).await;
        println!("  test_product_survives_category_delete: PASSED");

        test_product_filters($store).await;
        println!("  test_product_filters: PASSED");

        test_product_name_search_is_literal($store).await;
        println!("  test_product_name_search_is_literal: PASSED");
    };
}
