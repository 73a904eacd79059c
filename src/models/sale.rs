//! Checkout input and persisted sale records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One requested cart line. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

/// Checkout request body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

/// One priced line of a transaction.
///
/// `product_name` is a snapshot taken at sale time; later renames of the
/// product do not change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDetail {
    pub transaction_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub subtotal: i64,
}

/// A committed sale. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub total_amount: i64,
    pub created_at: NaiveDateTime,
    pub details: Vec<TransactionDetail>,
}
