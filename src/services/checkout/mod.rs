//! Checkout engine.
//!
//! Turns a cart into one committed [`Transaction`]: every line is priced from
//! the product's current price, stock is decremented, and the header and
//! detail rows are written, all inside a single [`UnitOfWork`]. Any failure
//! rolls everything back.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::ServiceError;
use crate::config::CheckoutConfig;
use crate::models::{CheckoutItem, Transaction, TransactionDetail};
use crate::storage::{SalesStore, UnitOfWork};
use crate::validation;


/// Processes checkouts against a [`SalesStore`].
pub struct CheckoutEngine {
    store: Arc<dyn SalesStore>,
    clock: Arc<dyn Clock>,
    config: CheckoutConfig,
}

impl CheckoutEngine {
    pub fn new(store: Arc<dyn SalesStore>, config: CheckoutConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the clock used for `created_at`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Price, persist and deduct stock for `items` atomically.
    ///
    /// Lines are processed in input order; a product listed twice sees the
    /// stock left by its earlier line. Row locks are taken up front in
    /// ascending product id order regardless of line order.
    pub async fn checkout(&self, items: &[CheckoutItem]) -> Result<Transaction, ServiceError> {
        validation::validate_checkout_items(items, self.config.max_items)?;

        let mut uow = self.store.begin().await?;

        match self.apply(uow.as_mut(), items).await {
            Ok(transaction) => {
                uow.commit().await?;
                info!(
                    transaction_id = transaction.id,
                    total_amount = transaction.total_amount,
                    lines = transaction.details.len(),
                    "Checkout committed"
                );
                Ok(transaction)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Checkout rollback failed");
                }
                debug!(error = %e, "Checkout rolled back");
                Err(e)
            }
        }
    }

    async fn apply(
        &self,
        uow: &mut dyn UnitOfWork,
        items: &[CheckoutItem],
    ) -> Result<Transaction, ServiceError> {
        let ids: Vec<i64> = items
            .iter()
            .map(|item| item.product_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        uow.lock_products(&ids).await?;

        let mut total_amount: i64 = 0;
        let mut details = Vec::with_capacity(items.len());

        for item in items {
            let product = uow
                .get_product(item.product_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("product", item.product_id))?;

            if self.config.enforce_non_negative_stock && item.quantity > product.stock {
                return Err(ServiceError::InsufficientStock {
                    product_id: product.id,
                    requested: item.quantity,
                    available: product.stock,
                });
            }

            let subtotal = product.price.checked_mul(item.quantity).ok_or_else(|| {
                ServiceError::Validation(format!("subtotal overflows for product id {}", product.id))
            })?;
            total_amount = total_amount
                .checked_add(subtotal)
                .ok_or_else(|| ServiceError::Validation("total amount overflows".to_string()))?;

            uow.decrement_stock(product.id, item.quantity).await?;

            details.push(TransactionDetail {
                transaction_id: 0,
                product_id: product.id,
                product_name: product.name,
                quantity: item.quantity,
                subtotal,
            });
        }

        let created_at = self.clock.now();
        let id = uow.insert_transaction(total_amount, created_at).await?;
        for detail in &mut details {
            detail.transaction_id = id;
        }
        uow.insert_transaction_details(&details).await?;

        Ok(Transaction {
            id,
            total_amount,
            created_at,
            details,
        })
    }
}
