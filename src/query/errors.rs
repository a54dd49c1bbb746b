//! # Query Errors

use thiserror::Error;

/// Result type for query evaluation
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while interpreting a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A filter named something other than state, district, commodity or market
    #[error("Invalid type: {0}")]
    InvalidType(String),
}
