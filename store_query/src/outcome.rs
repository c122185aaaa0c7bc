//! Persistence outcome of a data-mutating statement

use sqlx::postgres::PgQueryResult;

/// Metadata reported by a write: how many rows the statement touched.
///
/// `rows_affected` is `None` when the driver gave no count. A count that
/// cannot be read is taken as zero when deciding whether a statement matched
/// anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: Option<u64>,
}

impl ExecOutcome {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected: Some(rows_affected),
        }
    }

    pub fn unknown() -> Self {
        Self {
            rows_affected: None,
        }
    }

    /// A statement that ran and matched nothing, or whose count is unknown
    pub fn touched_nothing(&self) -> bool {
        self.rows_affected.unwrap_or(0) == 0
    }
}

impl From<PgQueryResult> for ExecOutcome {
    fn from(result: PgQueryResult) -> Self {
        Self::new(result.rows_affected())
    }
}
