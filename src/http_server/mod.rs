//! # Mandi Price HTTP Server
//!
//! Axum server exposing the query engine as a read-only JSON API.
//!
//! # Endpoints
//!
//! - `/` - Service metadata and example paths
//! - `/health` - Health check
//! - `/api/commodities[/:type/:value...]` - Substring filtering with exact query-string refinement
//! - `/api/commodity/:type/:value[...]` - Exact filtering
//! - `/api/unique[/:type]` - Distinct values
//! - `/api/stats[/:commodity]` - Price statistics

pub mod config;
pub mod errors;
pub mod extract;
pub mod query_routes;
pub mod response;
pub mod server;
pub mod service_routes;

pub use config::{ConfigError, HttpServerConfig};
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
