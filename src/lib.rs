//! # RouteHaus
//!
//! Expose typed PostgreSQL data-access operations as uniform HTTP handlers.
//!
//! An [`Operation`](handler::Operation) does one thing against the database
//! and reports the outcome of its statement. A [`Handler`](handler::Handler)
//! wraps it, checks the types it is invoked with, resets the output and turns
//! "no rows" and "zero rows affected" into a single NotFound result. A
//! [`Service`](service::Service) mounts handlers on an axum router and keeps
//! a catalog of what it mounted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routehaus::prelude::*;
//!
//! #[derive(Debug, Default, Serialize, Deserialize, FromRow)]
//! struct Item {
//!     _id: String,
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct ItemId {
//!     _id: String,
//! }
//!
//! struct ItemGet {
//!     db: Database,
//! }
//!
//! #[async_trait]
//! impl Operation for ItemGet {
//!     type Input = ItemId;
//!     type Output = Item;
//!
//!     async fn perform(&self, _ctx: &OperationContext, input: ItemId, output: &mut Item) -> OperationReport {
//!         let found = self
//!             .db
//!             .query()
//!             .select("item")
//!             .filter(QueryFilter::eq("_id", input._id))
//!             .fetch_one::<Item>()
//!             .await;
//!         match found {
//!             Ok(item) => {
//!                 *output = item;
//!                 OperationReport::success()
//!             }
//!             Err(err) => OperationReport::failed(err),
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), RouteHausError> {
//!     let config = AppConfig::load()?;
//!     let db = Database::open(&config.database)?;
//!
//!     let service = Service::new("Items", "0.1.0").route(
//!         HttpMethod::Get,
//!         "/item/{_id}",
//!         Handler::builder(ItemGet { db }, "Item").summary("Get an item").build(),
//!     );
//!
//!     if let Some(path) = &config.server.catalog_path {
//!         service.catalog().write_json(path)?;
//!     }
//!     serve(&config.server, service.into_router()).await
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod handler;
pub mod http;
pub mod prelude;
pub mod service;

pub use core::Database;
pub use errors::RouteHausError;
pub use handler::{
    Dispatch, ErrorStatus, Handler, HandlerBuilder, HandlerError, Operation, OperationContext,
    OperationError, OperationReport,
};
pub use http::HttpMethod;
pub use service::{serve, ApiCatalog, Service};

pub use config::{AppConfig, DatabaseConfig, ServerConfig};

// Re-export internal and external crates that appear in the public API
pub use async_trait;
pub use axum;
pub use sqlx;
pub use store_query;
