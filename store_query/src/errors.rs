//! Error types for the persistence layer

use thiserror::Error;

use crate::validation::ValidationError;

/// Message of the well-known "no rows" sentinel.
///
/// Operations that surface persistence failures as plain text use this exact
/// message to signal that a lookup matched nothing.
pub const NO_ROWS_MESSAGE: &str = "sql: no rows in result set";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{}", display_database(.0))]
    Database(#[from] sqlx::Error),

    #[error("Invalid identifier: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid query on {table}: {reason}")]
    InvalidQuery { table: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn display_database(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::RowNotFound => NO_ROWS_MESSAGE.to_string(),
        other => format!("Database error: {}", other),
    }
}

impl StoreError {
    pub fn invalid_query(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// True when the query expected a row and the database returned none.
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::RowNotFound))
    }

    /// True for PostgreSQL unique constraint violations (SQLSTATE 23505).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }

    /// True when the pool could not hand out a connection.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::PoolTimedOut)
                | Self::Database(sqlx::Error::PoolClosed)
                | Self::Database(sqlx::Error::Io(_))
        )
    }
}
