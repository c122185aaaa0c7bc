//! HTTP integration for handlers
//!
//! [`endpoint`] turns a shared [`Handler`] into an axum [`MethodRouter`]. The
//! request is decoded into the operation's input, the handler is invoked
//! through its type-erased [`Dispatch`] boundary and the result is rendered
//! as JSON.

pub mod decode;
pub mod response;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter, MethodRouter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::handler::{Dispatch, Handler, Operation, OperationContext};

pub use decode::{decode_request, merge_sources, Field, RequestInput, MAX_BODY_BYTES};
pub use response::success;

/// HTTP methods a handler can be mounted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn filter(&self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Post => MethodFilter::POST,
            Self::Put => MethodFilter::PUT,
            Self::Patch => MethodFilter::PATCH,
            Self::Delete => MethodFilter::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Mount a handler on one method
pub fn endpoint<Op>(method: HttpMethod, handler: Arc<Handler<Op>>) -> MethodRouter
where
    Op: Operation,
    Op::Input: DeserializeOwned,
    Op::Output: Serialize,
{
    on(method.filter(), move |request: Request| {
        let handler = Arc::clone(&handler);
        async move { handle(handler.as_ref(), request).await }
    })
}

/// Run one request through a handler
pub async fn handle<Op>(handler: &Handler<Op>, request: Request) -> Response
where
    Op: Operation,
    Op::Input: DeserializeOwned,
    Op::Output: Serialize,
{
    let tag = handler
        .descriptor()
        .tags()
        .first()
        .cloned()
        .unwrap_or_default();
    let ctx = OperationContext::new(tag);

    let input: Op::Input = match decode_request(request).await {
        Ok(input) => input,
        Err(e) => return e.into_response(),
    };

    let dispatcher: &dyn Dispatch = handler;
    let mut output = Op::Output::default();
    match dispatcher.dispatch(&ctx, Box::new(input), &mut output).await {
        Ok(()) => success(output),
        Err(e) => e.into_response(),
    }
}
