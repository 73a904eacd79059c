//! PostgreSQL implementations of storage interfaces.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{Result, Stores};
use crate::config::{PoolConfig, PostgresConfig};
use crate::utils::bootstrap::connect_with_retry;

mod sales_store;

// Catalog store uses the unified SQL implementation
pub use super::sql::postgres::PostgresCatalogStore;
pub use sales_store::{PostgresSalesStore, PostgresUnitOfWork};

/// Connect to PostgreSQL, retrying while the server comes up.
pub async fn connect(config: &PostgresConfig, limits: &PoolConfig) -> Result<PgPool> {
    let pool = connect_with_retry("postgres", limits.connect_retries, || {
        PgPoolOptions::new()
            .max_connections(limits.max_connections)
            .min_connections(limits.min_connections)
            .acquire_timeout(limits.acquire_timeout())
            .connect(&config.uri)
    })
    .await?;

    Ok(pool)
}

/// Apply the embedded PostgreSQL migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("migrations/postgres").run(pool).await?;
    Ok(())
}

/// Catalog and sales stores sharing one pool.
pub fn stores(pool: PgPool) -> Stores {
    Stores {
        catalog: Arc::new(PostgresCatalogStore::new(pool.clone())),
        sales: Arc::new(PostgresSalesStore::new(pool)),
    }
}
