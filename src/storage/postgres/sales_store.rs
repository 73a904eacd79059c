//! PostgreSQL SalesStore implementation.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool, Row};

use crate::models::{ReportWindow, SoldProduct, TransactionDetail};
use crate::storage::sql::postgres::Postgres;
use crate::storage::sql::sales_queries as queries;
use crate::storage::sql::SqlDatabase;
use crate::storage::{
    ProductSnapshot, Result, SalesStore, StorageError, UnitOfWork, WindowSummary, WindowTotals,
};

/// PostgreSQL sales store.
pub struct PostgresSalesStore {
    pool: PgPool,
}

impl PostgresSalesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesStore for PostgresSalesStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresUnitOfWork { tx: Some(tx) }))
    }

    async fn sum_and_count_transactions(&self, window: &ReportWindow) -> Result<WindowTotals> {
        let sql = Postgres::build_select(queries::sum_and_count(window));
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(queries::totals_from_row(&row)?)
    }

    async fn top_selling_product(&self, window: &ReportWindow) -> Result<Option<SoldProduct>> {
        let sql = Postgres::build_select(queries::top_selling_product(window));
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(queries::sold_product_from_row).transpose()?)
    }

    async fn summarize(&self, window: &ReportWindow) -> Result<WindowSummary> {
        let mut tx = self.pool.begin().await?;
        // Must be the first statement of the transaction.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let sql = Postgres::build_select(queries::sum_and_count(window));
        let row = sqlx::query(&sql).fetch_one(&mut *tx).await?;
        let totals = queries::totals_from_row(&row)?;

        let sql = Postgres::build_select(queries::top_selling_product(window));
        let row = sqlx::query(&sql).fetch_optional(&mut *tx).await?;
        let top_seller = row.as_ref().map(queries::sold_product_from_row).transpose()?;

        tx.commit().await?;
        Ok(WindowSummary { totals, top_seller })
    }
}

/// Checkout unit of work over a database transaction.
///
/// Product rows are read `FOR UPDATE`, so a concurrent checkout touching the
/// same product waits until this one commits or rolls back. The engine locks
/// the whole cart in id order first, which keeps two carts listing the same
/// products in opposite order from deadlocking. Dropping the unit unfinished
/// rolls the transaction back.
pub struct PostgresUnitOfWork {
    tx: Option<sqlx::Transaction<'static, sqlx::Postgres>>,
}

impl PostgresUnitOfWork {
    fn conn(&mut self) -> Result<&mut PgConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| StorageError::Unavailable("unit of work already finished".to_string()))
    }

    fn take(&mut self) -> Result<sqlx::Transaction<'static, sqlx::Postgres>> {
        self.tx
            .take()
            .ok_or_else(|| StorageError::Unavailable("unit of work already finished".to_string()))
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn lock_products(&mut self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let sql = Postgres::build_select(queries::lock_products(ids));
        sqlx::query(&sql).fetch_all(self.conn()?).await?;
        Ok(())
    }

    async fn get_product(&mut self, id: i64) -> Result<Option<ProductSnapshot>> {
        let sql = Postgres::build_select(queries::select_product_for_checkout(id, true));
        let row = sqlx::query(&sql).fetch_optional(self.conn()?).await?;
        Ok(row.as_ref().map(queries::snapshot_from_row).transpose()?)
    }

    async fn decrement_stock(&mut self, id: i64, quantity: i64) -> Result<()> {
        let sql = Postgres::build_update(queries::decrement_stock(id, quantity));
        sqlx::query(&sql).execute(self.conn()?).await?;
        Ok(())
    }

    async fn insert_transaction(&mut self, total_amount: i64, created_at: NaiveDateTime) -> Result<i64> {
        let sql = Postgres::build_insert(queries::insert_transaction(total_amount, created_at));
        let row = sqlx::query(&sql).fetch_one(self.conn()?).await?;
        Ok(row.try_get("id")?)
    }

    async fn insert_transaction_details(&mut self, details: &[TransactionDetail]) -> Result<()> {
        if details.is_empty() {
            return Ok(());
        }
        let sql = Postgres::build_insert(queries::insert_transaction_details(details));
        sqlx::query(&sql).execute(self.conn()?).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.take()?.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.take()?.rollback().await?;
        Ok(())
    }
}
