//! Bootstrap utilities for the kasir binary: tracing and connection retry.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the KASIR_LOG environment variable.
///
/// Defaults to "info" level if KASIR_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect to a backing service with exponential backoff retry.
///
/// # Arguments
/// * `service_name` - Human-readable name for logging (e.g., "sqlite", "postgres")
/// * `max_attempts` - Total attempts, including the first one
/// * `connect` - Async function that attempts to establish a connection
///
/// # Returns
/// The connection on success, or the last error once attempts run out.
pub async fn connect_with_retry<T, E, F, Fut>(
    service_name: &str,
    max_attempts: usize,
    connect: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    const INITIAL_DELAY: Duration = Duration::from_millis(100);
    const MAX_DELAY: Duration = Duration::from_secs(5);

    let backoff = ExponentialBuilder::default()
        .with_min_delay(INITIAL_DELAY)
        .with_max_delay(MAX_DELAY)
        .with_max_times(max_attempts.saturating_sub(1))
        .with_jitter();

    let result = connect
        .retry(backoff)
        .notify(|e: &E, delay: Duration| {
            warn!(
                "Failed to connect to {}: {}. Retrying in {:?}...",
                service_name, e, delay
            );
        })
        .await;

    match &result {
        Ok(_) => tracing::info!("Connected to {}", service_name),
        Err(e) => tracing::error!(
            "Failed to connect to {} after {} attempts: {}",
            service_name,
            max_attempts,
            e
        ),
    }

    result
}
