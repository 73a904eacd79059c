//! Input validation for external data.
//!
//! Provides centralized validation for all fields that cross trust boundaries
//! (path ids, query dates, catalog payloads, checkout carts).

use chrono::NaiveDate;

use crate::models::{CategoryInput, CheckoutItem, ProductInput, DATE_FORMAT};
use crate::services::ServiceError;

/// Length limits for validated fields.
pub mod limits {
    /// Maximum category or product name length.
    pub const MAX_NAME_LENGTH: usize = 255;
    /// Maximum category description length.
    pub const MAX_DESCRIPTION_LENGTH: usize = 1024;
}

/// Error constants for validation failures.
pub mod errmsg {
    pub const NAME_EMPTY: &str = "name cannot be empty";
    pub const NAME_TOO_LONG: &str = "name exceeds maximum length";
    pub const DESCRIPTION_TOO_LONG: &str = "description exceeds maximum length";

    pub const PRICE_NEGATIVE: &str = "price cannot be negative";
    pub const STOCK_NEGATIVE: &str = "stock cannot be negative";
    pub const CATEGORY_ID_INVALID: &str = "category_id must be a positive integer";

    pub const ITEMS_EMPTY: &str = "checkout requires at least one item";
    pub const TOO_MANY_ITEMS: &str = "checkout exceeds maximum items";
    pub const PRODUCT_ID_INVALID: &str = "product_id must be a positive integer";
    pub const QUANTITY_INVALID: &str = "quantity must be a positive integer";

    pub const DATE_INVALID: &str = "must be a date in YYYY-MM-DD format";
}

fn invalid(message: impl Into<String>) -> ServiceError {
    ServiceError::Validation(message.into())
}

/// Parse a path id. Non-numeric and non-positive values are rejected.
pub fn parse_id(raw: &str, entity: &str) -> Result<i64, ServiceError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid(format!("invalid {} id: {}", entity, raw))),
    }
}

/// Parse a `YYYY-MM-DD` query parameter named `field`.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| invalid(format!("{} {}", field, errmsg::DATE_INVALID)))
}

fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(invalid(errmsg::NAME_EMPTY));
    }
    if name.chars().count() > limits::MAX_NAME_LENGTH {
        return Err(invalid(format!(
            "{} (max: {})",
            errmsg::NAME_TOO_LONG,
            limits::MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Validate a category payload.
pub fn validate_category(input: &CategoryInput) -> Result<(), ServiceError> {
    validate_name(&input.name)?;
    if input.description.chars().count() > limits::MAX_DESCRIPTION_LENGTH {
        return Err(invalid(format!(
            "{} (max: {})",
            errmsg::DESCRIPTION_TOO_LONG,
            limits::MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

/// Validate a product payload.
///
/// The category is not required to exist: products may reference categories
/// that are later deleted.
pub fn validate_product(input: &ProductInput) -> Result<(), ServiceError> {
    validate_name(&input.name)?;
    if input.category_id <= 0 {
        return Err(invalid(errmsg::CATEGORY_ID_INVALID));
    }
    if input.price < 0 {
        return Err(invalid(errmsg::PRICE_NEGATIVE));
    }
    if input.stock < 0 {
        return Err(invalid(errmsg::STOCK_NEGATIVE));
    }
    Ok(())
}

/// Validate a checkout cart before any storage work starts.
pub fn validate_checkout_items(items: &[CheckoutItem], max_items: usize) -> Result<(), ServiceError> {
    if items.is_empty() {
        return Err(invalid(errmsg::ITEMS_EMPTY));
    }
    if items.len() > max_items {
        return Err(invalid(format!(
            "{} (max: {}, got: {})",
            errmsg::TOO_MANY_ITEMS,
            max_items,
            items.len()
        )));
    }
    for item in items {
        if item.product_id <= 0 {
            return Err(invalid(errmsg::PRODUCT_ID_INVALID));
        }
        if item.quantity <= 0 {
            return Err(invalid(format!(
                "{} (product id {})",
                errmsg::QUANTITY_INVALID,
                item.product_id
            )));
        }
    }
    Ok(())
}
