use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;

use super::{join_sql, object_fields, quoted_table, returning_clause};
use crate::bind::{bind_all, bind_all_as};
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::{QueryBuilder, QueryFilter};
use crate::validation::Identifier;
use crate::{debug_log, DbPool, ExecOutcome, StoreError};

/// Right-hand side of a SET assignment
#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    /// Bound as a parameter
    Value(Value),
    /// Placed into the SQL text as written. Never build one from user input.
    Expr(String),
}

/// UPDATE statement builder
///
/// An update needs at least one assignment and at least one filter; the
/// facade does not issue table-wide updates.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    pool: DbPool,
    table: String,
    set: Vec<(String, SetValue)>,
    query: QueryBuilder,
    returning: Vec<String>,
}

impl UpdateQuery {
    pub(crate) fn new(pool: DbPool, table: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
            set: Vec::new(),
            query: QueryBuilder::new(),
            returning: Vec::new(),
        }
    }

    fn assign(mut self, column: &str, value: SetValue) -> Self {
        match self.set.iter_mut().find(|(c, _)| c == column) {
            Some(slot) => slot.1 = value,
            None => self.set.push((column.to_string(), value)),
        }
        self
    }

    pub fn set(self, column: &str, value: impl Into<Value>) -> Self {
        self.assign(column, SetValue::Value(value.into()))
    }

    /// Assign a trusted SQL expression, e.g. `_change + 1`
    pub fn set_expr(self, column: &str, expr: &str) -> Self {
        self.assign(column, SetValue::Expr(expr.to_string()))
    }

    /// Assign every non-null field of a serializable struct
    pub fn set_from<T: Serialize>(mut self, model: &T) -> Result<Self, StoreError> {
        for (column, value) in object_fields(&self.table, model)? {
            if !value.is_null() {
                self = self.set(&column, value);
            }
        }
        Ok(self)
    }

    /// Drop an assignment, typically the key column copied in by `set_from`
    pub fn omit(mut self, column: &str) -> Self {
        self.set.retain(|(c, _)| c != column);
        self
    }

    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.query = self.query.filter(filter);
        self
    }

    /// Cast parameters for `column` to `sql_type`, in SET and WHERE alike
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

        if self.set.is_empty() {
            return Err(StoreError::invalid_query(&self.table, "update without assignments"));
        }
        if !self.query.has_conditions() {
            return Err(StoreError::invalid_query(&self.table, "update without filter"));
        }

        let mut values = Vec::new();
        let mut assignments = Vec::with_capacity(self.set.len());
        for (name, value) in &self.set {
            let column = Identifier::new(name)?.quoted();
            match value {
                SetValue::Value(v) => {
                    let sql_type = self.query.column_types().get(name).map(String::as_str);
                    let param = SqlGenerator::placeholder(values.len() + 1, sql_type)?;
                    values.push(v.clone());
                    assignments.push(format!("{} = {}", column, param));
                }
                SetValue::Expr(expr) => assignments.push(format!("{} = {}", column, expr)),
            }
        }

        let (where_clause, where_values) = self.query.build_where_clause(values.len() + 1)?;
        values.extend(where_values);
        let returning = returning_clause(&self.returning)?;

        let head = format!("UPDATE {} SET {}", table, assignments.join(", "));
        Ok((join_sql(&[&head, &where_clause, &returning]), values))
    }

    pub async fn execute(self) -> Result<ExecOutcome, StoreError> {
        let (sql, values) = self.to_sql()?;
        debug_log!("[update] {}: {} ({} params)", self.table, sql, values.len());

        let result = bind_all(sqlx::query(&sql), values)
            .execute(&self.pool)
            .await?;
        Ok(result.into())
    }

    /// Run the update and decode the RETURNING rows (`*` when none were named).
    /// No matching row yields an empty list and zero rows affected.
    pub async fn fetch_returning<T>(mut self) -> Result<(Vec<T>, ExecOutcome), StoreError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        if self.returning.is_empty() {
            self.returning.push("*".to_string());
        }
        let (sql, values) = self.to_sql()?;
        debug_log!("[update returning] {}: {}", self.table, sql);

        let rows = bind_all_as(sqlx::query_as::<_, T>(&sql), values)
            .fetch_all(&self.pool)
            .await?;
        let outcome = ExecOutcome::new(rows.len() as u64);
        Ok((rows, outcome))
    }
}
