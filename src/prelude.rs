//! Convenience re-exports for writing operations and assembling a service
//!
//! ```rust
//! use routehaus::prelude::*;
//! ```

pub use crate::core::Database;
pub use crate::errors::RouteHausError;
pub use crate::handler::{
    Dispatch, ErrorStatus, Handler, HandlerBuilder, HandlerConfig, HandlerError, Operation,
    OperationContext, OperationError, OperationReport,
};
pub use crate::http::HttpMethod;
pub use crate::service::{serve, ApiCatalog, Service};

pub use config::{AppConfig, DatabaseConfig, ServerConfig};

pub use store_query::{
    ExecOutcome, PaginationParams, QueryFacade, QueryFilter, SortOrder, StoreError,
};

// Common external dependencies
pub use anyhow;
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::{FromRow, PgPool};
pub use tokio;
