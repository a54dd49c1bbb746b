//! Request extractors
//!
//! Thin wrappers over axum's `Path` and `Query` whose rejections render as
//! the JSON 500 body instead of axum's plain-text 400.

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::errors::ApiError;
use crate::observability::{log_event_with_fields, Event};

/// Percent-decoded path parameters
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| unreadable(parts, rejection.body_text()))
    }
}

/// Query-string parameters
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| unreadable(parts, rejection.body_text()))
    }
}

fn unreadable(parts: &Parts, message: String) -> ApiError {
    let uri = parts.uri.to_string();
    log_event_with_fields(
        Event::QueryRejected,
        &[("uri", uri.as_str()), ("reason", message.as_str())],
    );
    ApiError::Internal(message)
}
