//! Storage configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Storage type discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Sqlite,
    Postgres,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Sqlite => f.write_str("sqlite"),
            StorageType::Postgres => f.write_str("postgres"),
        }
    }
}

/// Storage configuration (discriminated union).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage type discriminator.
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// SQLite-specific configuration.
    pub sqlite: SqliteConfig,
    /// PostgreSQL-specific configuration.
    pub postgres: PostgresConfig,
    /// Connection pool limits, shared by both backends.
    pub pool: PoolConfig,
}

impl StorageConfig {
    /// Point storage at a `DATABASE_URL`-style value.
    ///
    /// `postgres://` and `postgresql://` URLs select PostgreSQL; anything else
    /// is treated as a SQLite path, with an optional `sqlite:` scheme stripped.
    pub fn apply_database_url(&mut self, url: &str) {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            self.storage_type = StorageType::Postgres;
            self.postgres.uri = url.to_string();
        } else {
            self.storage_type = StorageType::Sqlite;
            let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"));
            self.sqlite.path = path.unwrap_or(url).to_string();
        }
    }
}

/// SQLite-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Path to database file. Parent directories are created on startup.
    pub path: String,
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "./data/kasir.db".to_string(),
            busy_timeout_secs: 30,
        }
    }
}

/// PostgreSQL-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    /// PostgreSQL connection URI.
    pub uri: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://localhost:5432/kasir".to_string(),
        }
    }
}

/// Connection pool limits.
///
/// `min_connections` keeps idle connections warm so report queries are not
/// starved while checkouts hold connections for their units of work.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum open connections.
    pub max_connections: u32,
    /// Idle connections kept ready.
    pub min_connections: u32,
    /// How long a caller waits for a free connection.
    pub acquire_timeout_secs: u64,
    /// Connection attempts at startup before giving up.
    pub connect_retries: usize,
}

impl PoolConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 5,
            acquire_timeout_secs: 30,
            connect_retries: 10,
        }
    }
}
