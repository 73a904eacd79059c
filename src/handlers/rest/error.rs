//! Mapping from service errors to HTTP responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use super::errmsg;
use crate::services::ServiceError;

/// Error response rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => {
                debug!(error = %err, "not found");
                Self::new(StatusCode::NOT_FOUND, err.to_string())
            }
            ServiceError::Validation(message) => {
                debug!(error = %message, "validation failed");
                Self::bad_request(message)
            }
            ServiceError::InsufficientStock { .. } => {
                debug!(error = %err, "insufficient stock");
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            ServiceError::Storage(source) => {
                error!(error = %source, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, errmsg::INTERNAL_ERROR)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected request body");
        Self::bad_request(format!("{}: {}", errmsg::INVALID_BODY, rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected query string");
        Self::bad_request(format!("{}: {}", errmsg::INVALID_QUERY, rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
