//! Unified SQL CatalogStore implementation.
//!
//! Statements are built by the plain functions below; a macro generates the
//! trait implementation for each SQL backend.

use std::marker::PhantomData;

use sea_query::{
    DeleteStatement, Expr, Func, InsertStatement, LikeExpr, Order, Query, SelectStatement,
    UpdateStatement,
};

use super::SqlDatabase;
use crate::models::{Category, CategoryInput, Product, ProductInput, ProductWithCategory};
use crate::storage::schema::{Aggregates, Categories, Products};
use crate::storage::ProductFilter;

/// SQL-based implementation of CatalogStore.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite).
pub struct SqlCatalogStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlCatalogStore<DB> {
    /// Create a new SQL catalog store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

// ============================================================================
// Statements
// ============================================================================

fn select_categories() -> SelectStatement {
    Query::select()
        .columns([Categories::Id, Categories::Name, Categories::Description])
        .from(Categories::Table)
        .order_by(Categories::Id, Order::Asc)
        .to_owned()
}

fn select_category(id: i64) -> SelectStatement {
    select_categories()
        .and_where(Expr::col(Categories::Id).eq(id))
        .to_owned()
}

fn insert_category(input: &CategoryInput) -> InsertStatement {
    Query::insert()
        .into_table(Categories::Table)
        .columns([Categories::Name, Categories::Description])
        .values_panic([input.name.clone().into(), input.description.clone().into()])
        .returning_col(Categories::Id)
        .to_owned()
}

fn update_category(id: i64, input: &CategoryInput) -> UpdateStatement {
    Query::update()
        .table(Categories::Table)
        .values([
            (Categories::Name, input.name.clone().into()),
            (Categories::Description, input.description.clone().into()),
        ])
        .and_where(Expr::col(Categories::Id).eq(id))
        .returning(Query::returning().columns([
            Categories::Id,
            Categories::Name,
            Categories::Description,
        ]))
        .to_owned()
}

fn delete_category(id: i64) -> DeleteStatement {
    Query::delete()
        .from_table(Categories::Table)
        .and_where(Expr::col(Categories::Id).eq(id))
        .to_owned()
}

/// Escape character for name search patterns.
const LIKE_ESCAPE: char = '!';

/// Case-insensitive substring pattern matching `name` literally.
fn contains_pattern(name: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(name.len() + 2);
    pattern.push('%');
    for c in name.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Products left-joined with their category so dangling category ids still list.
fn select_products(filter: &ProductFilter) -> SelectStatement {
    let mut stmt = Query::select();
    stmt.columns([
        (Products::Table, Products::Id),
        (Products::Table, Products::CategoryId),
        (Products::Table, Products::Name),
        (Products::Table, Products::Price),
        (Products::Table, Products::Stock),
    ])
    .expr_as(
        Expr::col((Categories::Table, Categories::Name)),
        Aggregates::CategoryName,
    )
    .from(Products::Table)
    .left_join(
        Categories::Table,
        Expr::col((Products::Table, Products::CategoryId))
            .equals((Categories::Table, Categories::Id)),
    )
    .order_by((Products::Table, Products::Id), Order::Asc);

    if let Some(name) = filter.name.as_deref() {
        stmt.and_where(
            Expr::expr(Func::lower(Expr::col((Products::Table, Products::Name))))
                .like(contains_pattern(name)),
        );
    }
    if let Some(category_id) = filter.category_id {
        stmt.and_where(Expr::col((Products::Table, Products::CategoryId)).eq(category_id));
    }

    stmt
}

fn select_product(id: i64) -> SelectStatement {
    select_products(&ProductFilter::default())
        .and_where(Expr::col((Products::Table, Products::Id)).eq(id))
        .to_owned()
}

fn insert_product(input: &ProductInput) -> InsertStatement {
    Query::insert()
        .into_table(Products::Table)
        .columns([
            Products::CategoryId,
            Products::Name,
            Products::Price,
            Products::Stock,
        ])
        .values_panic([
            input.category_id.into(),
            input.name.clone().into(),
            input.price.into(),
            input.stock.into(),
        ])
        .returning_col(Products::Id)
        .to_owned()
}

fn update_product(id: i64, input: &ProductInput) -> UpdateStatement {
    Query::update()
        .table(Products::Table)
        .values([
            (Products::CategoryId, input.category_id.into()),
            (Products::Name, input.name.clone().into()),
            (Products::Price, input.price.into()),
            (Products::Stock, input.stock.into()),
        ])
        .and_where(Expr::col(Products::Id).eq(id))
        .returning_col(Products::Id)
        .to_owned()
}

fn delete_product(id: i64) -> DeleteStatement {
    Query::delete()
        .from_table(Products::Table)
        .and_where(Expr::col(Products::Id).eq(id))
        .to_owned()
}

// ============================================================================
// Row mapping
// ============================================================================

fn category_from_row<R>(row: &R) -> Result<Category, sqlx::Error>
where
    R: sqlx::Row,
    for<'c> &'c str: sqlx::ColumnIndex<R>,
    i64: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    String: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

fn product_from_row<R>(row: &R) -> Result<ProductWithCategory, sqlx::Error>
where
    R: sqlx::Row,
    for<'c> &'c str: sqlx::ColumnIndex<R>,
    i64: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    String: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    Ok(ProductWithCategory {
        product: Product {
            id: row.try_get("id")?,
            category_id: row.try_get("category_id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
        },
        category_name: row.try_get("category_name")?,
    })
}

/// Macro to implement CatalogStore for a specific SQL backend.
///
/// This eliminates duplication between PostgreSQL and SQLite implementations
/// while maintaining full type safety.
macro_rules! impl_catalog_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::CatalogStore for SqlCatalogStore<$db_type> {
            async fn list_categories(&self) -> crate::storage::Result<Vec<Category>> {
                let sql = <$db_type>::build_select(select_categories());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
                let categories = rows
                    .iter()
                    .map(category_from_row)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(categories)
            }

            async fn get_category(&self, id: i64) -> crate::storage::Result<Option<Category>> {
                let sql = <$db_type>::build_select(select_category(id));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
                Ok(row.as_ref().map(category_from_row).transpose()?)
            }

            async fn create_category(
                &self,
                input: &CategoryInput,
            ) -> crate::storage::Result<Category> {
                use sqlx::Row;

                let sql = <$db_type>::build_insert(insert_category(input));
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                let id: i64 = row.try_get("id")?;
                Ok(input.clone().into_category(id))
            }

            async fn update_category(
                &self,
                id: i64,
                input: &CategoryInput,
            ) -> crate::storage::Result<Option<Category>> {
                let sql = <$db_type>::build_update(update_category(id, input));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
                Ok(row.as_ref().map(category_from_row).transpose()?)
            }

            async fn delete_category(&self, id: i64) -> crate::storage::Result<bool> {
                let sql = <$db_type>::build_delete(delete_category(id));
                let result = sqlx::query(&sql).execute(&self.pool).await?;
                Ok(result.rows_affected() > 0)
            }

            async fn list_products(
                &self,
                filter: &ProductFilter,
            ) -> crate::storage::Result<Vec<ProductWithCategory>> {
                let sql = <$db_type>::build_select(select_products(filter));
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
                let products = rows
                    .iter()
                    .map(product_from_row)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(products)
            }

            async fn get_product(
                &self,
                id: i64,
            ) -> crate::storage::Result<Option<ProductWithCategory>> {
                let sql = <$db_type>::build_select(select_product(id));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
                Ok(row.as_ref().map(product_from_row).transpose()?)
            }

            async fn create_product(&self, input: &ProductInput) -> crate::storage::Result<Product> {
                use sqlx::Row;

                let sql = <$db_type>::build_insert(insert_product(input));
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                let id: i64 = row.try_get("id")?;
                Ok(input.clone().into_product(id))
            }

            async fn update_product(
                &self,
                id: i64,
                input: &ProductInput,
            ) -> crate::storage::Result<Option<Product>> {
                let sql = <$db_type>::build_update(update_product(id, input));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
                Ok(row.map(|_| input.clone().into_product(id)))
            }

            async fn delete_product(&self, id: i64) -> crate::storage::Result<bool> {
                let sql = <$db_type>::build_delete(delete_product(id));
                let result = sqlx::query(&sql).execute(&self.pool).await?;
                Ok(result.rows_affected() > 0)
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_catalog_store!(super::postgres::Postgres, "postgres");
impl_catalog_store!(super::sqlite::Sqlite, "sqlite");
