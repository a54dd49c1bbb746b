//! # API Errors
//!
//! Error types for the HTTP layer and the JSON bodies they render to.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::data::Attribute;
use crate::query::QueryError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Body of every unhandled-failure response
pub const INTERNAL_ERROR: &str = "Something went wrong!";

/// HTTP API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// A path filter named an unknown attribute
    #[error("Invalid type")]
    InvalidType(String),

    /// Strict filtering matched nothing
    #[error("No matching records found")]
    NoMatchingRecords,

    /// Stats selection matched nothing
    #[error("No records found for this commodity")]
    CommodityNotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Anything else
    #[error("Something went wrong!")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidType(_) => StatusCode::BAD_REQUEST,
            ApiError::NoMatchingRecords | ApiError::CommodityNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The JSON body sent to the client
    pub fn body(&self) -> ErrorBody {
        let error = self.to_string();
        match self {
            ApiError::InvalidType(_) => ErrorBody {
                error,
                valid_types: Some(Attribute::names()),
                message: None,
            },
            ApiError::Internal(message) => ErrorBody {
                error,
                valid_types: None,
                message: Some(message.clone()),
            },
            ApiError::NoMatchingRecords | ApiError::CommodityNotFound => ErrorBody {
                error,
                valid_types: None,
                message: None,
            },
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidType(kind) => ApiError::InvalidType(kind),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_types: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
