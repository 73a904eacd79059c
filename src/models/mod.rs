//! Domain records shared by storage, services and the REST gateway.
//!
//! These are plain serde types. Persistence shapes live in `storage::schema`;
//! nothing here talks to a database.

mod catalog;
mod report;
mod sale;

pub use catalog::{Category, CategoryInput, Product, ProductInput, ProductWithCategory};
pub use report::{Report, ReportWindow, SoldProduct, NO_SALES_PRODUCT_NAME};
pub use sale::{CheckoutItem, CheckoutRequest, Transaction, TransactionDetail};

/// Timestamp format used for persisted `created_at` values and window bounds.
///
/// Lexicographic order of this format matches chronological order, which the
/// SQLite backend relies on for window comparisons.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format accepted by the report endpoints.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
