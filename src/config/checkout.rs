//! Checkout policy configuration.

use serde::Deserialize;

/// Default maximum lines accepted in one checkout request.
pub const DEFAULT_MAX_CHECKOUT_ITEMS: usize = 100;

/// Checkout policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Reject lines whose quantity exceeds the product's current stock.
    ///
    /// Off by default: stock is decremented unconditionally and may go
    /// negative, which is how existing deployments behave.
    pub enforce_non_negative_stock: bool,
    /// Maximum lines per checkout request.
    pub max_items: usize,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            enforce_non_negative_stock: false,
            max_items: DEFAULT_MAX_CHECKOUT_ITEMS,
        }
    }
}
