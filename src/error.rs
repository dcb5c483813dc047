// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::DatabaseError;

/// Which product operation a data-layer failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Get,
    Update,
    Delete,
}

impl Operation {
    pub fn error_prefix(&self) -> &'static str {
        match self {
            Operation::List => "Error getting products",
            Operation::Create => "Error creating product",
            Operation::Get => "Error getting product",
            Operation::Update => "Error updating product",
            Operation::Delete => "Error deleting product",
        }
    }
}

/// HTTP API error with the status code and body shape each failure class uses
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("Please provide name, image, and price")]
    MissingFields,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// Any failure from the data layer, bad input and outages alike
    #[error("{}: {source}", .operation.error_prefix())]
    Data {
        operation: Operation,
        #[source]
        source: DatabaseError,
    },

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 429 Too Many Requests
    #[error("{0}")]
    TooManyRequests(String),

    // 500 Internal Server Error
    #[error("{0}")]
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Data { .. } => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let message = self.to_string();
        match self {
            ApiError::MissingFields | ApiError::InvalidJson(_) => {
                json!({ "success": false, "error": message })
            }
            ApiError::NotFound(_) => json!({ "success": false, "message": message }),
            ApiError::Data { .. }
            | ApiError::Forbidden(_)
            | ApiError::TooManyRequests(_)
            | ApiError::InternalServerError(_) => json!({ "error": message }),
        }
    }

    pub fn data(operation: Operation) -> impl FnOnce(DatabaseError) -> Self {
        move |source| ApiError::Data { operation, source }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        ApiError::TooManyRequests(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Data { source, .. } = &self {
            tracing::error!("{}", source);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
