//! Sales report generator.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::ServiceError;
use crate::models::{Report, ReportWindow, SoldProduct};
use crate::storage::SalesStore;

/// Aggregates committed transactions over a date window.
pub struct ReportGenerator {
    store: Arc<dyn SalesStore>,
    clock: Arc<dyn Clock>,
}

impl ReportGenerator {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to resolve "today".
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Report over whole days `from..=to`, or just `from` when `to` is absent.
    ///
    /// Revenue, count and the best seller come from one consistent read. An
    /// inverted range is not an error here; it matches no transactions.
    pub async fn generate(&self, from: NaiveDate, to: Option<NaiveDate>) -> Result<Report, ServiceError> {
        let window = ReportWindow::new(from, to);
        debug!(start = %window.start, end = %window.end, "Generating report");

        let summary = self.store.summarize(&window).await?;

        Ok(Report {
            total_revenue: summary.totals.revenue,
            total_transaction_count: summary.totals.count,
            popular_product: summary.top_seller.unwrap_or_else(SoldProduct::none),
        })
    }

    /// Report for the current UTC day.
    pub async fn today(&self) -> Result<Report, ServiceError> {
        self.generate(self.clock.now().date(), None).await
    }
}
