//! Query facade
//!
//! [`QueryFacade`] sits on top of the connection pool and hands out statement
//! builders for one table at a time. Generated entity operations use it the
//! way they would use an ORM's query API:
//!
//! ```rust,no_run
//! # use store_query::prelude::*;
//! # #[derive(sqlx::FromRow)] struct Item { _id: String }
//! # async fn demo(db: QueryFacade) -> Result<(), StoreError> {
//! let mut page = PaginationParams::default();
//! page.fill_defaults();
//!
//! let items: Vec<Item> = db.select("item").paginate(&page).fetch_all().await?;
//! let outcome = db
//!     .delete("item")
//!     .filter(QueryFilter::eq("_id", "abc"))
//!     .execute()
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Writes report an [`ExecOutcome`](crate::ExecOutcome) so the handler layer
//! can tell a statement that matched nothing from one that succeeded.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use update::{SetValue, UpdateQuery};

use crate::validation::{column_list, Identifier};
use crate::{DbPool, StoreError};

/// Statement builders bound to a connection pool
#[derive(Clone, Debug)]
pub struct QueryFacade {
    pool: DbPool,
}

impl QueryFacade {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn select(&self, table: &str) -> SelectQuery {
        SelectQuery::new(self.pool.clone(), table)
    }

    pub fn insert(&self, table: &str) -> InsertQuery {
        InsertQuery::new(self.pool.clone(), table)
    }

    pub fn update(&self, table: &str) -> UpdateQuery {
        UpdateQuery::new(self.pool.clone(), table)
    }

    pub fn delete(&self, table: &str) -> DeleteQuery {
        DeleteQuery::new(self.pool.clone(), table)
    }
}

/// Join non-empty SQL fragments with single spaces
pub(crate) fn join_sql(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn quoted_table(table: &str) -> Result<String, StoreError> {
    Ok(Identifier::new(table)?.quoted())
}

/// RETURNING clause, empty when nothing was requested
pub(crate) fn returning_clause(columns: &[String]) -> Result<String, StoreError> {
    if columns.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("RETURNING {}", column_list(columns)?))
}

/// Object fields of a serializable value, keyed by column name
pub(crate) fn object_fields<T: serde::Serialize>(
    table: &str,
    value: &T,
) -> Result<serde_json::Map<String, serde_json::Value>, StoreError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::invalid_query(
            table,
            format!("expected an object to take columns from, got {}", other),
        )),
    }
}
