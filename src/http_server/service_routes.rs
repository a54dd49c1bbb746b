//! Service HTTP Routes
//!
//! Service metadata at `/` and the health check.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use super::response::{HealthResponse, ServiceInfo};
use crate::data::DataStore;

/// Example filter paths advertised at `/`
pub const EXAMPLE_ENDPOINTS: [&str; 4] = [
    "/api/commodities/state/Karnataka",
    "/api/commodities/state/Karnataka/district/Bangalore",
    "/api/commodities/state/Karnataka/commodity/Rice",
    "/api/commodities/state/Karnataka/market/Central Market",
];

/// Create service routes
pub fn service_routes(store: Arc<DataStore>) -> Router {
    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        .with_state(store)
}

async fn info_handler(State(store): State<Arc<DataStore>>) -> impl IntoResponse {
    Json(ServiceInfo {
        message: "Mandi Price API is running",
        endpoints: EXAMPLE_ENDPOINTS.to_vec(),
        records: store.len(),
        loaded_at: store.loaded_at(),
    })
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(response))
}
