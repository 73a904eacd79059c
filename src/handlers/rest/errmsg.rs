//! Error message constants for REST handlers.
//!
//! User-facing error messages are sanitized so storage details never reach
//! clients. Full error details are logged internally.

/// Storage or other internal failure.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Request body could not be decoded as the expected JSON.
pub const INVALID_BODY: &str = "Invalid request body";

/// Query string could not be decoded.
pub const INVALID_QUERY: &str = "Invalid query string";

/// Report request without `start_date`.
pub const START_DATE_REQUIRED: &str = "start_date is required";

/// Report request with `end_date` before `start_date`.
pub const END_BEFORE_START: &str = "end_date must not be before start_date";

/// Product listing with a non-numeric `category_id` filter.
pub const CATEGORY_FILTER_INVALID: &str = "category_id must be an integer";

pub const CATEGORY_DELETED: &str = "Category deleted successfully";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";
