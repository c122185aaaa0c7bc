//! The typed data-access capability a handler wraps

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use store_query::ExecOutcome;
use uuid::Uuid;

use super::error::OperationError;

/// Per-request information handed to an operation
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub request_id: Uuid,
    pub tag: String,
    pub received_at: DateTime<Utc>,
}

impl OperationContext {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            tag: tag.into(),
            received_at: Utc::now(),
        }
    }
}

/// What an operation reports back: the persistence outcome of its statement,
/// if it ran one, and its error, if any. Both can be present at once.
#[derive(Debug, Default)]
pub struct OperationReport {
    pub outcome: Option<ExecOutcome>,
    pub error: Option<OperationError>,
}

impl OperationReport {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn with_outcome(outcome: ExecOutcome) -> Self {
        Self {
            outcome: Some(outcome),
            error: None,
        }
    }

    pub fn failed(err: impl Into<OperationError>) -> Self {
        Self {
            outcome: None,
            error: Some(err.into()),
        }
    }

    pub fn and_outcome(mut self, outcome: ExecOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

impl<E: Into<OperationError>> From<Result<ExecOutcome, E>> for OperationReport {
    fn from(result: Result<ExecOutcome, E>) -> Self {
        match result {
            Ok(outcome) => Self::with_outcome(outcome),
            Err(err) => Self::failed(err),
        }
    }
}

impl<E: Into<OperationError>> From<Result<(), E>> for OperationReport {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(err) => Self::failed(err),
        }
    }
}

/// A typed data-access operation.
///
/// The handler resets `output` to `Output::default()` before every call, so
/// an implementation only writes what it produces.
///
/// ```rust,ignore
/// struct ItemDelete { db: Database }
///
/// #[async_trait]
/// impl Operation for ItemDelete {
///     type Input = ItemId;
///     type Output = Item;
///
///     async fn perform(&self, _ctx: &OperationContext, input: ItemId, output: &mut Item) -> OperationReport {
///         let result = self.db.query()
///             .delete("item")
///             .filter(QueryFilter::eq("_id", input.id))
///             .fetch_returning::<Item>()
///             .await;
///         match result {
///             Ok((mut rows, outcome)) => {
///                 if let Some(row) = rows.pop() { *output = row; }
///                 OperationReport::with_outcome(outcome)
///             }
///             Err(err) => OperationReport::failed(err),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Operation: Send + Sync + 'static {
    type Input: Send + 'static;
    type Output: Default + Send + 'static;

    async fn perform(
        &self,
        ctx: &OperationContext,
        input: Self::Input,
        output: &mut Self::Output,
    ) -> OperationReport;
}
