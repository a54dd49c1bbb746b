//! # HTTP Server
//!
//! Combines the service and query routers, applies CORS and panic
//! catching, and serves them.

use std::any::Any;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, AllowOrigin, CorsLayer};

use super::config::HttpServerConfig;
use super::errors::{ApiError, INTERNAL_ERROR};
use super::query_routes::query_routes;
use super::service_routes::service_routes;
use crate::data::DataStore;
use crate::observability::{log_event, log_event_with_fields, Event};

/// HTTP server for the mandi price API
pub struct HttpServer {
    config: HttpServerConfig,
    store: Arc<DataStore>,
    router: Router,
}

impl HttpServer {
    /// Create a server over an already loaded dataset
    pub fn new(config: HttpServerConfig, store: DataStore) -> Self {
        let store = Arc::new(store);
        let router = Self::build_router(&config, store.clone());
        Self {
            config,
            store,
            router,
        }
    }

    /// Create a server, loading the dataset named by the config.
    ///
    /// A dataset that cannot be loaded yields an empty store, not an error.
    pub fn with_config(config: HttpServerConfig) -> Self {
        let store = DataStore::load(&config.resolved_data_path());
        Self::new(config, store)
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &HttpServerConfig, store: Arc<DataStore>) -> Router {
        let cors_layer = if config.allows_any_origin() {
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(cors::Any)
                .allow_headers(cors::Any)
        };

        Router::new()
            .merge(service_routes(store.clone()))
            .merge(query_routes(store))
            .layer(
                ServiceBuilder::new()
                    .layer(cors_layer)
                    .layer(CatchPanicLayer::custom(handle_panic)),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// The dataset being served
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        let records = self.store.len().to_string();
        log_event_with_fields(
            Event::Serving,
            &[("addr", addr.as_str()), ("records", records.as_str())],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, serve until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Turn a handler panic into the generic 500 body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        INTERNAL_ERROR.to_string()
    };

    log_event_with_fields(Event::HandlerPanic, &[("message", message.as_str())]);
    ApiError::Internal(message).into_response()
}
