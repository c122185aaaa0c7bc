//! Operation-to-handler adapter
//!
//! [`Handler`] wraps one [`Operation`] and exposes it through the type-erased
//! [`Dispatch`] trait, which is what the routing layer stores. Every call
//! goes through the same steps:
//!
//! 1. Downcast input and output to the operation's types, failing with
//!    [`HandlerError::InvalidType`] before the operation runs.
//! 2. Reset the output to its default value.
//! 3. Run the operation and normalize its report: a "no rows" error becomes
//!    NotFound, and a statement that touched zero rows becomes NotFound even
//!    when no error was reported. Any other error passes through.

use async_trait::async_trait;
use std::any::{type_name, Any, TypeId};
use tracing::Instrument;

use super::descriptor::{HandlerConfig, HandlerDescriptor};
use super::error::{HandlerError, Position};
use super::operation::{Operation, OperationContext, OperationReport};
use super::status::ErrorStatus;
use crate::debug_log;

/// Statuses every handler declares regardless of its operation
pub const DECLARED_ERRORS: [ErrorStatus; 2] = [ErrorStatus::AlreadyExists, ErrorStatus::NotFound];

/// Type-erased handler interface used by the routing layer
#[async_trait]
pub trait Dispatch: Send + Sync {
    fn descriptor(&self) -> &HandlerDescriptor;

    fn input_type_id(&self) -> TypeId;

    fn output_type_id(&self) -> TypeId;

    async fn dispatch(
        &self,
        ctx: &OperationContext,
        input: Box<dyn Any + Send>,
        output: &mut (dyn Any + Send),
    ) -> Result<(), HandlerError>;
}

/// A registered operation together with its declared metadata
pub struct Handler<Op: Operation> {
    operation: Op,
    descriptor: HandlerDescriptor,
}

impl<Op: Operation> std::fmt::Debug for Handler<Op> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl<Op: Operation> Handler<Op> {
    /// Handler with only a tag; see [`Handler::builder`] for the rest
    pub fn new(operation: Op, tag: impl Into<String>) -> Self {
        Self::builder(operation, tag).build()
    }

    pub fn builder(operation: Op, tag: impl Into<String>) -> HandlerBuilder<Op> {
        let mut config = HandlerConfig::default();
        config.add_tag(tag);
        HandlerBuilder { operation, config }
    }

    pub fn operation(&self) -> &Op {
        &self.operation
    }

    /// Typed entry point; runs through the same checks as [`Dispatch::dispatch`]
    pub async fn call(
        &self,
        ctx: &OperationContext,
        input: Op::Input,
    ) -> Result<Op::Output, HandlerError> {
        let mut output = Op::Output::default();
        self.dispatch(ctx, Box::new(input), &mut output).await?;
        Ok(output)
    }

    async fn invoke(
        &self,
        ctx: &OperationContext,
        input: Op::Input,
        output: &mut Op::Output,
    ) -> Result<(), HandlerError> {
        *output = Op::Output::default();
        let report = self.operation.perform(ctx, input, output).await;
        debug_log!(
            elapsed_ms = (chrono::Utc::now() - ctx.received_at).num_milliseconds(),
            rows_affected = ?report.outcome.and_then(|o| o.rows_affected),
            failed = report.error.is_some(),
            "operation finished"
        );
        normalize(report)
    }
}

#[async_trait]
impl<Op: Operation> Dispatch for Handler<Op> {
    fn descriptor(&self) -> &HandlerDescriptor {
        &self.descriptor
    }

    fn input_type_id(&self) -> TypeId {
        TypeId::of::<Op::Input>()
    }

    fn output_type_id(&self) -> TypeId {
        TypeId::of::<Op::Output>()
    }

    async fn dispatch(
        &self,
        ctx: &OperationContext,
        input: Box<dyn Any + Send>,
        output: &mut (dyn Any + Send),
    ) -> Result<(), HandlerError> {
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %ctx.request_id,
            tag = %ctx.tag,
            input = self.descriptor.input_type,
        );

        async move {
            let input = input.downcast::<Op::Input>().map_err(|_| {
                tracing::warn!("handler received a foreign input type");
                HandlerError::InvalidType {
                    position: Position::Input,
                    expected: type_name::<Op::Input>(),
                }
            })?;
            let output = output.downcast_mut::<Op::Output>().ok_or_else(|| {
                tracing::warn!("handler received a foreign output type");
                HandlerError::InvalidType {
                    position: Position::Output,
                    expected: type_name::<Op::Output>(),
                }
            })?;

            self.invoke(ctx, *input, output).await
        }
        .instrument(span)
        .await
    }
}

/// Collapse an operation report into the handler's result.
///
/// Zero rows affected is checked last and always wins, so an UPDATE that
/// matched nothing surfaces as NotFound whatever error state came before.
/// An outcome whose row count could not be read counts as zero; only a
/// missing outcome leaves the result alone.
pub fn normalize(report: OperationReport) -> Result<(), HandlerError> {
    let mut result = match report.error {
        Some(err) if err.is_no_rows() => {
            debug_log!("operation reported no rows");
            Err(HandlerError::NotFound)
        }
        Some(err) => Err(HandlerError::Operation(err)),
        None => Ok(()),
    };

    if report.outcome.is_some_and(|outcome| outcome.touched_nothing()) {
        debug_log!("operation affected zero rows");
        result = Err(HandlerError::NotFound);
    }

    result
}

/// Assembles a [`Handler`]'s configuration once, before it is shared
pub struct HandlerBuilder<Op: Operation> {
    operation: Op,
    config: HandlerConfig,
}

impl<Op: Operation> HandlerBuilder<Op> {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.config.add_tag(tag);
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.config.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.config.deprecated = deprecated;
        self
    }

    pub fn expected_error(mut self, status: ErrorStatus) -> Self {
        self.config.expected_errors.insert(status);
        self
    }

    /// Apply an arbitrary change to the configuration
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut HandlerConfig),
    {
        f(&mut self.config);
        self
    }

    pub fn build(self) -> Handler<Op> {
        let mut config = self.config;
        config.expected_errors.extend(DECLARED_ERRORS);

        Handler {
            operation: self.operation,
            descriptor: HandlerDescriptor {
                config,
                input_type: type_name::<Op::Input>(),
                output_type: type_name::<Op::Output>(),
            },
        }
    }
}
