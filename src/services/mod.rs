//! Business services: checkout, reporting and catalog management.
//!
//! Services are transport-agnostic. They take storage trait objects and
//! return [`ServiceError`], which the REST gateway maps to status codes.

pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod report;

pub use catalog::CatalogService;
pub use checkout::CheckoutEngine;
pub use clock::{Clock, FixedClock, SystemClock};
pub use report::ReportGenerator;

use crate::storage::StorageError;

/// Errors returned by the services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("insufficient stock for product id {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
