use serde_json::Value;
use sqlx::postgres::PgRow;

use super::{join_sql, quoted_table};
use crate::bind::{bind_all, bind_all_as};
use crate::query_builder::{PaginationParams, QueryBuilder, QueryFilter, SortOrder};
use crate::validation::column_list;
use crate::{debug_log, DbPool, StoreError};

/// SELECT statement builder
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pool: DbPool,
    table: String,
    columns: Vec<String>,
    query: QueryBuilder,
}

impl SelectQuery {
    pub(crate) fn new(pool: DbPool, table: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
            columns: Vec::new(),
            query: QueryBuilder::new(),
        }
    }

    /// Restrict the selected columns; all columns by default
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
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

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.query = self.query.order_by(field, order);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.query = self.query.offset(offset);
        self
    }

    pub fn paginate(mut self, params: &PaginationParams) -> Self {
        self.query = self.query.paginate(params);
        self
    }

    /// Render the statement and the values to bind
    pub fn to_sql(&self) -> Result<(String, Vec<Value>), StoreError> {
        let table = quoted_table(&self.table)?;
        let columns = column_list(&self.columns)?;
        let (where_clause, order_clause, limit_clause, values) = self.query.build()?;

        let head = format!("SELECT {} FROM {}", columns, table);
        let sql = join_sql(&[&head, &where_clause, &order_clause, &limit_clause]);
        Ok((sql, values))
    }

    fn count_sql(&self) -> Result<(String, Vec<Value>), StoreError> {
        let table = quoted_table(&self.table)?;
        let (where_clause, values) = self.query.build_where_clause(1)?;

        let head = format!("SELECT COUNT(*) FROM {}", table);
        Ok((join_sql(&[&head, &where_clause]), values))
    }

    pub async fn fetch_all<T>(self) -> Result<Vec<T>, StoreError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let (sql, values) = self.to_sql()?;
        debug_log!("[select] {}: {} ({} params)", self.table, sql, values.len());

        let rows = bind_all_as(sqlx::query_as::<_, T>(&sql), values)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetch exactly one row; a missing row is `sqlx::Error::RowNotFound`
    pub async fn fetch_one<T>(self) -> Result<T, StoreError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let this = self.limit(1);
        let (sql, values) = this.to_sql()?;
        debug_log!("[select one] {}: {} ({} params)", this.table, sql, values.len());

        let row = bind_all_as(sqlx::query_as::<_, T>(&sql), values)
            .fetch_one(&this.pool)
            .await?;
        Ok(row)
    }

    pub async fn fetch_optional<T>(self) -> Result<Option<T>, StoreError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let this = self.limit(1);
        let (sql, values) = this.to_sql()?;

        let row = bind_all_as(sqlx::query_as::<_, T>(&sql), values)
            .fetch_optional(&this.pool)
            .await?;
        Ok(row)
    }

    /// Count matching rows, ignoring ordering and pagination
    pub async fn count(self) -> Result<i64, StoreError> {
        let (sql, values) = self.count_sql()?;

        let row = bind_all(sqlx::query(&sql), values)
            .fetch_one(&self.pool)
            .await?;
        Ok(sqlx::Row::try_get::<i64, _>(&row, 0)?)
    }
}
