//! Storage implementations.
//!
//! Persistence is split across two traits: [`CatalogStore`] for category and
//! product CRUD, and [`SalesStore`] for the checkout unit of work and the
//! report aggregates. SQL backends share query construction through
//! [`sql::SqlDatabase`]; [`MockStore`] backs unit tests.

use std::sync::Arc;

use crate::config::{StorageConfig, StorageType};

mod catalog_store;
pub mod mock;
mod sales_store;

#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod schema;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use catalog_store::{CatalogStore, ProductFilter};
pub use mock::MockStore;
pub use sales_store::{ProductSnapshot, SalesStore, UnitOfWork, WindowSummary, WindowTotals};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// The pair of stores every service is built from.
///
/// Both usually point at the same backend and pool.
#[derive(Clone)]
pub struct Stores {
    pub catalog: Arc<dyn CatalogStore>,
    pub sales: Arc<dyn SalesStore>,
}

impl Stores {
    /// Use one backend for both traits.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CatalogStore + SalesStore + 'static,
    {
        Self {
            catalog: store.clone(),
            sales: store,
        }
    }
}

/// Initialize storage based on configuration.
///
/// Connects with retry, applies migrations and returns the stores for the
/// configured backend.
pub async fn init_storage(config: &StorageConfig) -> std::result::Result<Stores, Box<dyn std::error::Error>> {
    match config.storage_type {
        StorageType::Sqlite => {
            #[cfg(feature = "sqlite")]
            {
                tracing::info!("Storage: sqlite at {}", config.sqlite.path);
                let pool = sqlite::connect(&config.sqlite, &config.pool).await?;
                sqlite::migrate(&pool).await?;
                Ok(sqlite::stores(pool))
            }
            #[cfg(not(feature = "sqlite"))]
            {
                tracing::error!("SQLite storage requested but 'sqlite' feature is not enabled");
                Err("SQLite feature not enabled".into())
            }
        }
        StorageType::Postgres => {
            #[cfg(feature = "postgres")]
            {
                tracing::info!("Storage: postgres");
                let pool = postgres::connect(&config.postgres, &config.pool).await?;
                postgres::migrate(&pool).await?;
                Ok(postgres::stores(pool))
            }
            #[cfg(not(feature = "postgres"))]
            {
                tracing::error!("PostgreSQL storage requested but 'postgres' feature is not enabled");
                Err("PostgreSQL feature not enabled".into())
            }
        }
    }
}
