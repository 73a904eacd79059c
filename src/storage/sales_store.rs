//! SalesStore trait: the checkout unit of work and report aggregates.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::Result;
use crate::models::{ReportWindow, SoldProduct, TransactionDetail};

/// Product fields a checkout needs, read inside the unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

/// Revenue and transaction count over a report window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowTotals {
    pub revenue: i64,
    pub count: i64,
}

/// Totals and best seller for one window, read from a single snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSummary {
    pub totals: WindowTotals,
    pub top_seller: Option<SoldProduct>,
}

/// One atomic checkout.
///
/// Everything done through a unit of work becomes visible together on
/// [`commit`](UnitOfWork::commit) or not at all. Dropping it without
/// committing rolls back.
///
/// Products read through [`get_product`](UnitOfWork::get_product) stay locked
/// against concurrent checkouts until the unit of work ends, so the stock seen
/// is the stock decremented. Callers that touch several products call
/// [`lock_products`](UnitOfWork::lock_products) first so that every checkout
/// acquires row locks in the same order.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Lock the given product rows, in slice order, until the unit of work
    /// ends. `ids` should be sorted and distinct. Unknown ids are ignored.
    async fn lock_products(&mut self, ids: &[i64]) -> Result<()>;

    async fn get_product(&mut self, id: i64) -> Result<Option<ProductSnapshot>>;

    /// Subtract `quantity` from the product's stock. No floor is applied.
    async fn decrement_stock(&mut self, id: i64, quantity: i64) -> Result<()>;

    /// Insert the transaction header and return its assigned id.
    async fn insert_transaction(&mut self, total_amount: i64, created_at: NaiveDateTime) -> Result<i64>;

    /// Insert all detail lines in one statement.
    async fn insert_transaction_details(&mut self, details: &[TransactionDetail]) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Storage interface for sales.
///
/// Implementations:
/// - `SqliteSalesStore`: `BEGIN IMMEDIATE` on a dedicated connection
/// - `PostgresSalesStore`: transaction with `SELECT ... FOR UPDATE`
/// - `MockStore`: in-memory, for tests
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Start a checkout.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;

    /// Sum of `total_amount` and number of transactions created in `window`.
    async fn sum_and_count_transactions(&self, window: &ReportWindow) -> Result<WindowTotals>;

    /// Product with the highest summed quantity across transactions in
    /// `window`, or `None` when nothing sold. Ties go to the lowest product id.
    async fn top_selling_product(&self, window: &ReportWindow) -> Result<Option<SoldProduct>>;

    /// Both aggregates for `window`, read in one read-only transaction so a
    /// concurrent checkout is either fully counted or not at all.
    async fn summarize(&self, window: &ReportWindow) -> Result<WindowSummary>;
}
