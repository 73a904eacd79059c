//! REST API for the point-of-sale backend.
//!
//! Endpoints (English paths, with the Indonesian aliases older clients use):
//! - `GET /health` - health check
//! - `/api/categories[/{id}]` - category CRUD
//! - `GET /api/categories/{id}/products` or `/api/categories/{id}/produk`
//! - `/api/products[/{id}]` or `/api/produk[/{id}]` - product CRUD and search
//! - `POST /api/checkout` - checkout a cart
//! - `GET /api/report/today` or `GET /api/report/hari-ini` - today's report
//! - `GET /api/report?start_date=YYYY-MM-DD[&end_date=YYYY-MM-DD]`

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{CheckoutConfig, ServerConfig};
use crate::services::{CatalogService, CheckoutEngine, ReportGenerator};
use crate::storage::Stores;

mod catalog;
pub mod errmsg;
mod error;
mod sales;


pub use error::ApiError;

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub checkout: Arc<CheckoutEngine>,
    pub reports: Arc<ReportGenerator>,
}

impl AppState {
    /// Services over `stores`, using the system clock.
    pub fn new(stores: &Stores, checkout: CheckoutConfig) -> Self {
        Self {
            catalog: CatalogService::new(stores.catalog.clone()),
            checkout: Arc::new(CheckoutEngine::new(stores.sales.clone(), checkout)),
            reports: Arc::new(ReportGenerator::new(stores.sales.clone())),
        }
    }
}

/// Start the REST server.
///
/// When `config.port` is 0, the OS assigns an ephemeral port. The actual
/// bound address is always logged so it can be discovered.
pub async fn serve(
    state: AppState,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let local = listener.local_addr()?;
    info!(address = %local, "REST API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let category_item = get(catalog::get_category)
        .put(catalog::update_category)
        .delete(catalog::delete_category);
    let product_collection = get(catalog::list_products).post(catalog::create_product);
    let product_item = get(catalog::get_product)
        .put(catalog::update_product)
        .delete(catalog::delete_product);

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route("/api/categories/{id}", category_item)
        .route(
            "/api/categories/{id}/products",
            get(catalog::list_category_products),
        )
        .route("/api/categories/{id}/produk", get(catalog::list_category_products))
        .route("/api/products", product_collection.clone())
        .route("/api/products/{id}", product_item.clone())
        .route("/api/produk", product_collection)
        .route("/api/produk/{id}", product_item)
        .route("/api/checkout", post(sales::checkout))
        .route("/api/report", get(sales::report_by_date))
        .route("/api/report/today", get(sales::report_today))
        .route("/api/report/hari-ini", get(sales::report_today))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
