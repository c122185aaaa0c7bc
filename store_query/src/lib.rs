//! Store Query - persistence layer for generated entity operations
//!
//! This crate provides the pieces an operation touches when it talks to
//! PostgreSQL: a query facade bound to the connection pool, the query builder
//! it delegates to, pagination defaults, identifier validation, and the
//! persistence outcome reported back to the handler adapter.

/// Conditional debug logging, compiled in only with the `debug-logging` feature
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;

mod bind;
pub mod errors;
pub mod facade;
pub mod outcome;
pub mod prelude;
pub mod query_builder;
pub mod validation;

pub use errors::{StoreError, NO_ROWS_MESSAGE};
pub use facade::{DeleteQuery, InsertQuery, QueryFacade, SelectQuery, UpdateQuery};
pub use outcome::ExecOutcome;
pub use query_builder::{PaginationParams, QueryBuilder, QueryFilter, QueryOperator, SortOrder};
pub use validation::{Identifier, SqlType, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;
