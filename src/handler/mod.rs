//! Typed operations and the handlers that expose them
//!
//! An [`Operation`] performs one data-access task with concrete input and
//! output types. A [`Handler`] wraps it, records its documentation metadata
//! and turns its report into a uniform [`HandlerError`].

pub mod adapter;
pub mod descriptor;
pub mod error;
pub mod operation;
pub mod status;

pub use adapter::{normalize, Dispatch, Handler, HandlerBuilder, DECLARED_ERRORS};
pub use descriptor::{HandlerConfig, HandlerDescriptor};
pub use error::{HandlerError, OperationError, Position};
pub use operation::{Operation, OperationContext, OperationReport};
pub use status::ErrorStatus;
