//! SQLite implementations of storage interfaces.

use std::path::Path;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::{Result, Stores};
use crate::config::{PoolConfig, SqliteConfig};
use crate::utils::bootstrap::connect_with_retry;

mod sales_store;

pub use super::sql::sqlite::SqliteCatalogStore;
pub use sales_store::{SqliteSalesStore, SqliteUnitOfWork};

/// Open a WAL-mode pool on `config.path`, creating the file and its parent
/// directories if needed.
pub async fn connect(config: &SqliteConfig, limits: &PoolConfig) -> Result<SqlitePool> {
    if let Some(parent) = Path::new(&config.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let opts = SqliteConnectOptions::new()
        .filename(&config.path)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(config.busy_timeout_secs))
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = connect_with_retry("sqlite", limits.connect_retries, || {
        SqlitePoolOptions::new()
            .max_connections(limits.max_connections)
            .min_connections(limits.min_connections)
            .acquire_timeout(limits.acquire_timeout())
            .connect_with(opts.clone())
    })
    .await?;

    Ok(pool)
}

/// Apply the embedded SQLite migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("migrations/sqlite").run(pool).await?;
    Ok(())
}

/// Catalog and sales stores sharing one pool.
pub fn stores(pool: SqlitePool) -> Stores {
    Stores {
        catalog: Arc::new(SqliteCatalogStore::new(pool.clone())),
        sales: Arc::new(SqliteSalesStore::new(pool)),
    }
}
