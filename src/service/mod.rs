//! Service assembly and startup
//!
//! A [`Service`] collects handlers into an axum router while recording each
//! one in its [`ApiCatalog`].

pub mod catalog;

use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::debug_log;
use crate::errors::RouteHausError;
use crate::handler::{Dispatch, Handler, Operation};
use crate::http::{endpoint, HttpMethod};
use config::ServerConfig;

pub use catalog::{ApiCatalog, RouteEntry};

pub struct Service {
    router: Router,
    catalog: ApiCatalog,
}

impl Service {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            router: Router::new(),
            catalog: ApiCatalog::new(title, version),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.catalog.description = Some(description.into());
        self
    }

    /// Mount a handler. Paths use axum syntax, e.g. `/item/{_id}`.
    pub fn route<Op>(mut self, method: HttpMethod, path: &str, handler: Handler<Op>) -> Self
    where
        Op: Operation,
        Op::Input: DeserializeOwned,
        Op::Output: Serialize,
    {
        let handler = Arc::new(handler);
        debug_log!(%method, path, "mounting handler");

        self.catalog
            .routes
            .push(RouteEntry::new(method, path, handler.descriptor().clone()));
        self.router = self.router.route(path, endpoint(method, handler));
        self
    }

    pub fn catalog(&self) -> &ApiCatalog {
        &self.catalog
    }

    /// Router with request tracing and permissive CORS
    pub fn into_router(self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        self.router.layer(middleware)
    }
}

/// Bind the configured address and serve until ctrl-c
pub async fn serve(config: &ServerConfig, router: Router) -> Result<(), RouteHausError> {
    let addr = resolve(config).await?;
    let listener = TcpListener::bind(addr).await?;

    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn resolve(config: &ServerConfig) -> Result<SocketAddr, RouteHausError> {
    let address = config.bind_address();
    if let Ok(addr) = address.parse() {
        return Ok(addr);
    }
    tokio::net::lookup_host(address.as_str())
        .await?
        .next()
        .ok_or_else(|| RouteHausError::Unresolvable(config.bind_address()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        return std::future::pending().await;
    }
    warn!("Received ctrl-c, shutting down");
}
