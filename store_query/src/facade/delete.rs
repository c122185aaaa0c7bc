use serde_json::Value;
use sqlx::postgres::PgRow;

use super::{join_sql, quoted_table, returning_clause};
use crate::bind::{bind_all, bind_all_as};
use crate::query_builder::{QueryBuilder, QueryFilter};
use crate::{debug_log, DbPool, ExecOutcome, StoreError};

/// DELETE statement builder; refuses to run without a filter
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    pool: DbPool,
    table: String,
    query: QueryBuilder,
    returning: Vec<String>,
}

impl DeleteQuery {
    pub(crate) fn new(pool: DbPool, table: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
            query: QueryBuilder::new(),
            returning: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.query = self.query.filter(filter);
        self
    }

    /// Cast parameters for `column` to `sql_type`, e.g. `uuid`
    pub fn column_type(mut self, column: &str, sql_type: &str) -> Self {
        self.query = self.query.column_type(column, sql_type);
        self
    }

    pub fn returning(mut self, columns: &[&str]) -> Self {
        self.returning = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn to_sql(&self) -> Result<(String, Vec<Value>), StoreError> {
        let table = quoted_table(&self.table)?;
        if !self.query.has_conditions() {
            return Err(StoreError::invalid_query(&self.table, "delete without filter"));
        }

        let (where_clause, values) = self.query.build_where_clause(1)?;
        let returning = returning_clause(&self.returning)?;

        let head = format!("DELETE FROM {}", table);
        Ok((join_sql(&[&head, &where_clause, &returning]), values))
    }

    pub async fn execute(self) -> Result<ExecOutcome, StoreError> {
        let (sql, values) = self.to_sql()?;
        debug_log!("[delete] {}: {} ({} params)", self.table, sql, values.len());

        let result = bind_all(sqlx::query(&sql), values)
            .execute(&self.pool)
            .await?;
        Ok(result.into())
    }

    pub async fn fetch_returning<T>(mut self) -> Result<(Vec<T>, ExecOutcome), StoreError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        if self.returning.is_empty() {
            self.returning.push("*".to_string());
        }
        let (sql, values) = self.to_sql()?;
        debug_log!("[delete returning] {}: {}", self.table, sql);

        let rows = bind_all_as(sqlx::query_as::<_, T>(&sql), values)
            .fetch_all(&self.pool)
            .await?;
        let outcome = ExecOutcome::new(rows.len() as u64);
        Ok((rows, outcome))
    }
}
