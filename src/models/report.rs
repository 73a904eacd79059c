//! Sales report view and its aggregation window.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Product name reported when a window has no sales.
pub const NO_SALES_PRODUCT_NAME: &str = "N/A";

/// Best-selling product within a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoldProduct {
    pub product_name: String,
    pub quantity: i64,
}

impl SoldProduct {
    /// Placeholder for windows without any sold line.
    pub fn none() -> Self {
        Self {
            product_name: NO_SALES_PRODUCT_NAME.to_string(),
            quantity: 0,
        }
    }
}

/// Aggregated sales over a window. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total_revenue: i64,
    pub total_transaction_count: i64,
    pub popular_product: SoldProduct,
}

/// Inclusive `[start, end]` timestamp range a report aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportWindow {
    /// Normalize a date range to whole days.
    ///
    /// `from` is floored to 00:00:00 and `to` (or `from` when absent) is
    /// ceiled to 23:59:59. Ordering is not checked: an inverted range simply
    /// matches nothing.
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> Self {
        let last_day = to.unwrap_or(from);
        Self {
            start: from.and_time(NaiveTime::MIN),
            end: last_day.and_time(end_of_day()),
        }
    }

    /// Whether `at` falls inside the window, bounds included.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}
