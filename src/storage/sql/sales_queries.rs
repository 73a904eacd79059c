//! Statements shared by the SQL sales stores.
//!
//! Timestamps are bound as `TIMESTAMP_FORMAT` strings: SQLite stores them as
//! TEXT that sorts chronologically, PostgreSQL casts the literal to TIMESTAMP.

use chrono::NaiveDateTime;
use sea_query::{
    Expr, Func, InsertStatement, LockType, Order, Query, SelectStatement, UpdateStatement,
};

use crate::models::{ReportWindow, SoldProduct, TransactionDetail, TIMESTAMP_FORMAT};
use crate::storage::schema::{Aggregates, Products, TransactionDetails, Transactions};
use crate::storage::{ProductSnapshot, WindowTotals};

pub(crate) fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Product lookup for checkout. `lock` adds `FOR UPDATE` where supported.
pub(crate) fn select_product_for_checkout(id: i64, lock: bool) -> SelectStatement {
    let mut stmt = Query::select();
    stmt.columns([Products::Id, Products::Name, Products::Price, Products::Stock])
        .from(Products::Table)
        .and_where(Expr::col(Products::Id).eq(id));
    if lock {
        stmt.lock(LockType::Update);
    }
    stmt
}

/// Row locks for a whole cart, taken in ascending id order so concurrent
/// checkouts over overlapping products cannot deadlock.
pub(crate) fn lock_products(ids: &[i64]) -> SelectStatement {
    Query::select()
        .column(Products::Id)
        .from(Products::Table)
        .and_where(Expr::col(Products::Id).is_in(ids.iter().copied()))
        .order_by(Products::Id, Order::Asc)
        .lock(LockType::Update)
        .to_owned()
}

pub(crate) fn decrement_stock(id: i64, quantity: i64) -> UpdateStatement {
    Query::update()
        .table(Products::Table)
        .value(Products::Stock, Expr::col(Products::Stock).sub(quantity))
        .and_where(Expr::col(Products::Id).eq(id))
        .to_owned()
}

pub(crate) fn insert_transaction(total_amount: i64, created_at: NaiveDateTime) -> InsertStatement {
    Query::insert()
        .into_table(Transactions::Table)
        .columns([Transactions::TotalAmount, Transactions::CreatedAt])
        .values_panic([total_amount.into(), format_timestamp(created_at).into()])
        .returning_col(Transactions::Id)
        .to_owned()
}

/// All detail lines in a single multi-row INSERT.
pub(crate) fn insert_transaction_details(details: &[TransactionDetail]) -> InsertStatement {
    let mut stmt = Query::insert();
    stmt.into_table(TransactionDetails::Table).columns([
        TransactionDetails::TransactionId,
        TransactionDetails::ProductId,
        TransactionDetails::ProductName,
        TransactionDetails::Quantity,
        TransactionDetails::Subtotal,
    ]);
    for detail in details {
        stmt.values_panic([
            detail.transaction_id.into(),
            detail.product_id.into(),
            detail.product_name.clone().into(),
            detail.quantity.into(),
            detail.subtotal.into(),
        ]);
    }
    stmt
}

fn window_condition(column: Expr, window: &ReportWindow) -> sea_query::SimpleExpr {
    column.between(format_timestamp(window.start), format_timestamp(window.end))
}

/// Revenue and count over a window. SUM is cast so PostgreSQL returns BIGINT.
pub(crate) fn sum_and_count(window: &ReportWindow) -> SelectStatement {
    Query::select()
        .expr_as(
            Expr::cust_with_expr(
                "CAST(COALESCE(SUM($1), 0) AS BIGINT)",
                Expr::col(Transactions::TotalAmount),
            ),
            Aggregates::TotalRevenue,
        )
        .expr_as(
            Func::count(Expr::col(Transactions::Id)),
            Aggregates::TransactionCount,
        )
        .from(Transactions::Table)
        .and_where(window_condition(Expr::col(Transactions::CreatedAt), window))
        .to_owned()
}

/// Best seller over a window, grouped by product id and named by the sale
/// time snapshot. Ties go to the lowest product id.
pub(crate) fn top_selling_product(window: &ReportWindow) -> SelectStatement {
    Query::select()
        .column((TransactionDetails::Table, TransactionDetails::ProductId))
        .expr_as(
            Func::max(Expr::col((TransactionDetails::Table, TransactionDetails::ProductName))),
            TransactionDetails::ProductName,
        )
        .expr_as(
            Expr::cust_with_expr(
                "CAST(SUM($1) AS BIGINT)",
                Expr::col((TransactionDetails::Table, TransactionDetails::Quantity)),
            ),
            Aggregates::TotalSold,
        )
        .from(TransactionDetails::Table)
        .inner_join(
            Transactions::Table,
            Expr::col((TransactionDetails::Table, TransactionDetails::TransactionId))
                .equals((Transactions::Table, Transactions::Id)),
        )
        .and_where(window_condition(
            Expr::col((Transactions::Table, Transactions::CreatedAt)),
            window,
        ))
        .group_by_col((TransactionDetails::Table, TransactionDetails::ProductId))
        .order_by(Aggregates::TotalSold, Order::Desc)
        .order_by(
            (TransactionDetails::Table, TransactionDetails::ProductId),
            Order::Asc,
        )
        .limit(1)
        .to_owned()
}

// ============================================================================
// Row mapping
// ============================================================================

pub(crate) fn snapshot_from_row<R>(row: &R) -> Result<ProductSnapshot, sqlx::Error>
where
    R: sqlx::Row,
    for<'c> &'c str: sqlx::ColumnIndex<R>,
    i64: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    String: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    Ok(ProductSnapshot {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        stock: row.try_get("stock")?,
    })
}

pub(crate) fn totals_from_row<R>(row: &R) -> Result<WindowTotals, sqlx::Error>
where
    R: sqlx::Row,
    for<'c> &'c str: sqlx::ColumnIndex<R>,
    i64: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    Ok(WindowTotals {
        revenue: row.try_get("total_revenue")?,
        count: row.try_get("transaction_count")?,
    })
}

pub(crate) fn sold_product_from_row<R>(row: &R) -> Result<SoldProduct, sqlx::Error>
where
    R: sqlx::Row,
    for<'c> &'c str: sqlx::ColumnIndex<R>,
    i64: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    String: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    Ok(SoldProduct {
        product_name: row.try_get("product_name")?,
        quantity: row.try_get("total_sold")?,
    })
}
