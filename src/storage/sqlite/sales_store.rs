//! SQLite SalesStore implementation.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::pool::PoolConnection;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::warn;

use crate::models::{ReportWindow, SoldProduct, TransactionDetail};
use crate::storage::sql::sales_queries as queries;
use crate::storage::sql::sqlite::Sqlite;
use crate::storage::sql::SqlDatabase;
use crate::storage::{
    ProductSnapshot, Result, SalesStore, StorageError, UnitOfWork, WindowSummary, WindowTotals,
};

/// SQLite sales store.
pub struct SqliteSalesStore {
    pool: SqlitePool,
}

impl SqliteSalesStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesStore for SqliteSalesStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        Ok(Box::new(SqliteUnitOfWork::begin(&self.pool).await?))
    }

    async fn sum_and_count_transactions(&self, window: &ReportWindow) -> Result<WindowTotals> {
        let sql = Sqlite::build_select(queries::sum_and_count(window));
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(queries::totals_from_row(&row)?)
    }

    async fn top_selling_product(&self, window: &ReportWindow) -> Result<Option<SoldProduct>> {
        let sql = Sqlite::build_select(queries::top_selling_product(window));
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(queries::sold_product_from_row).transpose()?)
    }

    async fn summarize(&self, window: &ReportWindow) -> Result<WindowSummary> {
        // A deferred transaction reads both aggregates from one snapshot.
        let mut tx = self.pool.begin().await?;

        let sql = Sqlite::build_select(queries::sum_and_count(window));
        let row = sqlx::query(&sql).fetch_one(&mut *tx).await?;
        let totals = queries::totals_from_row(&row)?;

        let sql = Sqlite::build_select(queries::top_selling_product(window));
        let row = sqlx::query(&sql).fetch_optional(&mut *tx).await?;
        let top_seller = row.as_ref().map(queries::sold_product_from_row).transpose()?;

        tx.commit().await?;
        Ok(WindowSummary { totals, top_seller })
    }
}

/// Checkout unit of work on a dedicated pooled connection.
///
/// `BEGIN IMMEDIATE` takes the database write lock up front, so concurrent
/// checkouts serialize instead of racing to upgrade shared locks. If the unit
/// is dropped unfinished the connection is detached and closed, which makes
/// SQLite discard the open transaction.
pub struct SqliteUnitOfWork {
    conn: Option<PoolConnection<sqlx::Sqlite>>,
}

impl SqliteUnitOfWork {
    async fn begin(pool: &SqlitePool) -> Result<Self> {
        let mut conn = pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(Self { conn: Some(conn) })
    }

    fn conn(&mut self) -> Result<&mut SqliteConnection> {
        self.conn
            .as_deref_mut()
            .ok_or_else(|| StorageError::Unavailable("unit of work already finished".to_string()))
    }

    async fn finish(&mut self, statement: &str) -> Result<()> {
        let Some(mut conn) = self.conn.take() else {
            return Err(StorageError::Unavailable("unit of work already finished".to_string()));
        };
        match sqlx::query(statement).execute(&mut *conn).await {
            Ok(_) => Ok(()),
            Err(e) => {
                // Never hand a connection with an open transaction back to the pool.
                drop(conn.detach());
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn lock_products(&mut self, _ids: &[i64]) -> Result<()> {
        // BEGIN IMMEDIATE already holds the database write lock.
        Ok(())
    }

    async fn get_product(&mut self, id: i64) -> Result<Option<ProductSnapshot>> {
        let sql = Sqlite::build_select(queries::select_product_for_checkout(id, false));
        let row = sqlx::query(&sql).fetch_optional(self.conn()?).await?;
        Ok(row.as_ref().map(queries::snapshot_from_row).transpose()?)
    }

    async fn decrement_stock(&mut self, id: i64, quantity: i64) -> Result<()> {
        let sql = Sqlite::build_update(queries::decrement_stock(id, quantity));
        sqlx::query(&sql).execute(self.conn()?).await?;
        Ok(())
    }

    async fn insert_transaction(&mut self, total_amount: i64, created_at: NaiveDateTime) -> Result<i64> {
        let sql = Sqlite::build_insert(queries::insert_transaction(total_amount, created_at));
        let row = sqlx::query(&sql).fetch_one(self.conn()?).await?;
        Ok(row.try_get("id")?)
    }

    async fn insert_transaction_details(&mut self, details: &[TransactionDetail]) -> Result<()> {
        if details.is_empty() {
            return Ok(());
        }
        let sql = Sqlite::build_insert(queries::insert_transaction_details(details));
        sqlx::query(&sql).execute(self.conn()?).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.finish("COMMIT").await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.finish("ROLLBACK").await
    }
}

impl Drop for SqliteUnitOfWork {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            warn!("Checkout unit of work dropped without commit, discarding connection");
            drop(conn.detach());
        }
    }
}
