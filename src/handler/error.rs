//! Error types crossing the handler boundary
//!
//! [`OperationError`] is what an operation reports. [`HandlerError`] is what
//! the adapter hands to the routing layer after normalization: the two
//! not-found cases collapse into [`HandlerError::NotFound`] and everything
//! else an operation says passes through untouched.

use std::fmt;
use store_query::{StoreError, NO_ROWS_MESSAGE};
use thiserror::Error;

use super::status::ErrorStatus;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An outcome the operation classified itself
    #[error("{message}")]
    Status {
        status: ErrorStatus,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OperationError {
    pub fn status(status: ErrorStatus, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::status(ErrorStatus::AlreadyExists, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::status(ErrorStatus::InvalidArgument, message)
    }

    /// Wrap a store error, classifying unique violations as AlreadyExists
    pub fn from_store(err: StoreError) -> Self {
        if err.is_unique_violation() {
            Self::already_exists(err.to_string())
        } else {
            Self::Store(err)
        }
    }

    /// The "no rows" signal: structurally a `RowNotFound`, or any error whose
    /// text is exactly the sentinel message.
    pub fn is_no_rows(&self) -> bool {
        match self {
            Self::Store(err) if err.is_no_rows() => true,
            other => other.to_string() == NO_ROWS_MESSAGE,
        }
    }

    /// Category the routing layer should report for this error
    pub fn error_status(&self) -> ErrorStatus {
        match self {
            Self::Status { status, .. } => *status,
            Self::Store(err) if err.is_unavailable() => ErrorStatus::Unavailable,
            Self::Store(err) if err.is_unique_violation() => ErrorStatus::AlreadyExists,
            Self::Store(_) | Self::Other(_) => ErrorStatus::Internal,
        }
    }
}

impl From<sqlx::Error> for OperationError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(StoreError::Database(err))
    }
}

/// Which side of the dispatch carried the wrong type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Input,
    Output,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

#[derive(Debug, Error)]
pub enum HandlerError {
    /// The caller passed a value the handler was not built for
    #[error("invalid type of {position}, expected: {expected}")]
    InvalidType {
        position: Position,
        expected: &'static str,
    },

    #[error("not found")]
    NotFound,

    /// The request could not be turned into the handler's input
    #[error("invalid request: {0}")]
    Decode(String),

    #[error(transparent)]
    Operation(OperationError),
}

impl HandlerError {
    pub fn status(&self) -> ErrorStatus {
        match self {
            Self::InvalidType { .. } => ErrorStatus::Internal,
            Self::NotFound => ErrorStatus::NotFound,
            Self::Decode(_) => ErrorStatus::InvalidArgument,
            Self::Operation(err) => err.error_status(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
