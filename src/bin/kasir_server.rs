//! kasir-server: point-of-sale REST API
//!
//! ## Architecture
//! ```text
//! [client] --(HTTP/JSON)--> [kasir-server] --> [SQLite | PostgreSQL]
//! ```
//!
//! ## Configuration
//! - `--config <path>` / KASIR_CONFIG: YAML config file (default: config.yaml)
//! - KASIR__SERVER__PORT, KASIR__STORAGE__TYPE, ...: per-field overrides
//! - DATABASE_URL: connection string, selects the backend by scheme
//! - KASIR_LOG: tracing filter (default: info)

use clap::Parser;
use tracing::info;

use kasir::config::Config;
use kasir::handlers::rest::{self, AppState};
use kasir::storage::init_storage;
use kasir::utils::bootstrap::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "kasir-server")]
#[command(about = "Point-of-sale REST API over SQLite or PostgreSQL")]
#[command(version)]
struct Args {
    /// YAML configuration file, layered over ./config.yaml
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    let config = Config::load(args.config.as_deref()).map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        storage = %config.storage.storage_type,
        address = %config.server.bind_address(),
        "kasir-server starting"
    );

    let stores = init_storage(&config.storage).await?;
    let state = AppState::new(&stores, config.checkout.clone());

    rest::serve(state, &config.server)
        .await
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    info!("kasir-server stopped");
    Ok(())
}
