//! Shared storage integration tests.
//!
//! Tests the CatalogStore and SalesStore interfaces against all implementations.
//! Each implementation module imports these test functions and runs them.

pub mod catalog_store_tests;
pub mod sales_store_tests;
