//! Error types for the routehaus crate
//!
//! Errors raised while wiring a service together: opening the database,
//! loading configuration, binding the listener, writing the catalog.
//! Per-request failures are [`HandlerError`](crate::handler::HandlerError).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteHausError {
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Store(#[from] store_query::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid listen address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Could not resolve listen address {0}")]
    Unresolvable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
