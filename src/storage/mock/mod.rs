//! Mock storage implementation for testing.
//!
//! [`MockStore`] implements both store traits over one in-memory state. A unit
//! of work holds the state lock until it ends and stages its writes on a copy,
//! so checkouts serialize and uncommitted work is never visible.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::{
    CatalogStore, ProductFilter, ProductSnapshot, Result, SalesStore, StorageError, UnitOfWork,
    WindowSummary, WindowTotals,
};
use crate::models::{
    Category, CategoryInput, Product, ProductInput, ProductWithCategory, ReportWindow, SoldProduct,
    Transaction, TransactionDetail,
};


#[derive(Debug, Clone)]
struct StoredTransaction {
    total_amount: i64,
    created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
struct MockState {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    transactions: BTreeMap<i64, StoredTransaction>,
    details: Vec<TransactionDetail>,
    last_category_id: i64,
    last_product_id: i64,
    last_transaction_id: i64,
}

impl MockState {
    fn with_category_name(&self, product: &Product) -> ProductWithCategory {
        ProductWithCategory {
            product: product.clone(),
            category_name: self
                .categories
                .get(&product.category_id)
                .map(|c| c.name.clone()),
        }
    }

    fn totals(&self, window: &ReportWindow) -> WindowTotals {
        self.transactions
            .values()
            .filter(|t| window.contains(t.created_at))
            .fold(WindowTotals::default(), |acc, t| WindowTotals {
                revenue: acc.revenue + t.total_amount,
                count: acc.count + 1,
            })
    }

    fn top_seller(&self, window: &ReportWindow) -> Option<SoldProduct> {
        // product_id -> (quantity, MAX(product_name))
        let mut sold: BTreeMap<i64, (i64, String)> = BTreeMap::new();
        for detail in &self.details {
            let in_window = self
                .transactions
                .get(&detail.transaction_id)
                .map(|t| window.contains(t.created_at))
                .unwrap_or(false);
            if !in_window {
                continue;
            }
            let entry = sold
                .entry(detail.product_id)
                .or_insert_with(|| (0, detail.product_name.clone()));
            entry.0 += detail.quantity;
            if detail.product_name > entry.1 {
                entry.1 = detail.product_name.clone();
            }
        }

        // BTreeMap iterates in id order; strict > keeps the lowest id on ties.
        let mut best: Option<(i64, String)> = None;
        for (quantity, name) in sold.into_values() {
            if best.as_ref().map(|(q, _)| quantity > *q).unwrap_or(true) {
                best = Some((quantity, name));
            }
        }

        best.map(|(quantity, product_name)| SoldProduct {
            product_name,
            quantity,
        })
    }
}

#[derive(Default)]
struct FailFlags {
    begin: RwLock<bool>,
    insert_details: RwLock<bool>,
    reports: RwLock<bool>,
    catalog: RwLock<bool>,
}

fn injected(operation: &str) -> StorageError {
    StorageError::Unavailable(format!("injected failure: {}", operation))
}

/// In-memory catalog and sales store.
#[derive(Default)]
pub struct MockStore {
    state: Arc<Mutex<MockState>>,
    lock_requests: Arc<Mutex<Vec<Vec<i64>>>>,
    fail: FailFlags,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make [`SalesStore::begin`] fail.
    pub async fn set_fail_on_begin(&self, fail: bool) {
        *self.fail.begin.write().await = fail;
    }

    /// Make detail inserts fail, after stock and header writes have been staged.
    pub async fn set_fail_on_insert_details(&self, fail: bool) {
        *self.fail.insert_details.write().await = fail;
    }

    /// Make the report aggregates fail.
    pub async fn set_fail_on_reports(&self, fail: bool) {
        *self.fail.reports.write().await = fail;
    }

    /// Make every catalog operation fail.
    pub async fn set_fail_on_catalog(&self, fail: bool) {
        *self.fail.catalog.write().await = fail;
    }

    /// Committed transactions with their details, ordered by id.
    pub async fn transactions(&self) -> Vec<Transaction> {
        let state = self.state.lock().await;
        state
            .transactions
            .iter()
            .map(|(id, stored)| Transaction {
                id: *id,
                total_amount: stored.total_amount,
                created_at: stored.created_at,
                details: state
                    .details
                    .iter()
                    .filter(|d| d.transaction_id == *id)
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    /// Committed stock of a product.
    pub async fn stock_of(&self, product_id: i64) -> Option<i64> {
        self.state
            .lock()
            .await
            .products
            .get(&product_id)
            .map(|p| p.stock)
    }

    /// Every id list passed to [`UnitOfWork::lock_products`], committed or not.
    pub async fn lock_requests(&self) -> Vec<Vec<i64>> {
        self.lock_requests.lock().await.clone()
    }

    async fn check_reports(&self, operation: &str) -> Result<()> {
        if *self.fail.reports.read().await {
            return Err(injected(operation));
        }
        Ok(())
    }

    async fn check_catalog(&self, operation: &str) -> Result<()> {
        if *self.fail.catalog.read().await {
            return Err(injected(operation));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MockStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.check_catalog("list_categories").await?;
        Ok(self.state.lock().await.categories.values().cloned().collect())
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.check_catalog("get_category").await?;
        Ok(self.state.lock().await.categories.get(&id).cloned())
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category> {
        self.check_catalog("create_category").await?;
        let mut state = self.state.lock().await;
        state.last_category_id += 1;
        let category = input.clone().into_category(state.last_category_id);
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: i64, input: &CategoryInput) -> Result<Option<Category>> {
        self.check_catalog("update_category").await?;
        let mut state = self.state.lock().await;
        Ok(state.categories.get_mut(&id).map(|existing| {
            *existing = input.clone().into_category(id);
            existing.clone()
        }))
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        self.check_catalog("delete_category").await?;
        Ok(self.state.lock().await.categories.remove(&id).is_some())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductWithCategory>> {
        self.check_catalog("list_products").await?;
        let state = self.state.lock().await;
        Ok(state
            .products
            .values()
            .filter(|p| filter.matches(p))
            .map(|p| state.with_category_name(p))
            .collect())
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductWithCategory>> {
        self.check_catalog("get_product").await?;
        let state = self.state.lock().await;
        Ok(state.products.get(&id).map(|p| state.with_category_name(p)))
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        self.check_catalog("create_product").await?;
        let mut state = self.state.lock().await;
        state.last_product_id += 1;
        let product = input.clone().into_product(state.last_product_id);
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, input: &ProductInput) -> Result<Option<Product>> {
        self.check_catalog("update_product").await?;
        let mut state = self.state.lock().await;
        Ok(state.products.get_mut(&id).map(|existing| {
            *existing = input.clone().into_product(id);
            existing.clone()
        }))
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        self.check_catalog("delete_product").await?;
        Ok(self.state.lock().await.products.remove(&id).is_some())
    }
}

#[async_trait]
impl SalesStore for MockStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        if *self.fail.begin.read().await {
            return Err(injected("begin"));
        }
        let fail_on_insert_details = *self.fail.insert_details.read().await;
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MockUnitOfWork {
            guard,
            staged,
            lock_requests: self.lock_requests.clone(),
            fail_on_insert_details,
        }))
    }

    async fn sum_and_count_transactions(&self, window: &ReportWindow) -> Result<WindowTotals> {
        self.check_reports("sum_and_count_transactions").await?;
        Ok(self.state.lock().await.totals(window))
    }

    async fn top_selling_product(&self, window: &ReportWindow) -> Result<Option<SoldProduct>> {
        self.check_reports("top_selling_product").await?;
        Ok(self.state.lock().await.top_seller(window))
    }

    async fn summarize(&self, window: &ReportWindow) -> Result<WindowSummary> {
        self.check_reports("summarize").await?;
        let state = self.state.lock().await;
        Ok(WindowSummary {
            totals: state.totals(window),
            top_seller: state.top_seller(window),
        })
    }
}

/// Unit of work holding the store lock with writes staged on a copy.
struct MockUnitOfWork {
    guard: OwnedMutexGuard<MockState>,
    staged: MockState,
    lock_requests: Arc<Mutex<Vec<Vec<i64>>>>,
    fail_on_insert_details: bool,
}

#[async_trait]
impl UnitOfWork for MockUnitOfWork {
    async fn lock_products(&mut self, ids: &[i64]) -> Result<()> {
        // The store lock is already held; only record the request.
        self.lock_requests.lock().await.push(ids.to_vec());
        Ok(())
    }

    async fn get_product(&mut self, id: i64) -> Result<Option<ProductSnapshot>> {
        Ok(self.staged.products.get(&id).map(|p| ProductSnapshot {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            stock: p.stock,
        }))
    }

    async fn decrement_stock(&mut self, id: i64, quantity: i64) -> Result<()> {
        if let Some(product) = self.staged.products.get_mut(&id) {
            product.stock -= quantity;
        }
        Ok(())
    }

    async fn insert_transaction(&mut self, total_amount: i64, created_at: NaiveDateTime) -> Result<i64> {
        self.staged.last_transaction_id += 1;
        let id = self.staged.last_transaction_id;
        self.staged.transactions.insert(
            id,
            StoredTransaction {
                total_amount,
                created_at,
            },
        );
        Ok(id)
    }

    async fn insert_transaction_details(&mut self, details: &[TransactionDetail]) -> Result<()> {
        if self.fail_on_insert_details {
            return Err(injected("insert_transaction_details"));
        }
        self.staged.details.extend_from_slice(details);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MockUnitOfWork {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
