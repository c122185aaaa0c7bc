//! Query builder
//!
//! Collects the WHERE/ORDER BY/LIMIT parts shared by every statement the
//! facade produces.

use crate::query_builder::filter::QueryFilter;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::pagination::PaginationParams;
use crate::query_builder::sql_generation::{ColumnTypes, SqlGenerator};
use crate::validation::ValidationError;
use serde_json::Value;

/// Rendered query parts: WHERE clause, ORDER BY clause, LIMIT clause, values
pub type QueryParts = (String, String, String, Vec<Value>);

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) column_types: ColumnTypes,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    /// Add multiple filters (combined with AND)
    pub fn filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.conditions.extend(filters);
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by.push((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Copy whatever the pagination parameters carry onto this query
    pub fn paginate(mut self, params: &PaginationParams) -> Self {
        if let Some(limit) = params.limit {
            self.limit = Some(limit);
        }
        if let Some(offset) = params.offset {
            self.offset = Some(offset);
        }
        self
    }

    /// Cast every parameter compared against `column` to `sql_type`
    pub fn column_type(mut self, column: &str, sql_type: &str) -> Self {
        self.column_types.insert(column.to_string(), sql_type.to_string());
        self
    }

    pub fn column_types(&self) -> &ColumnTypes {
        &self.column_types
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn build_where_clause(
        &self,
        first_param: usize,
    ) -> Result<(String, Vec<Value>), ValidationError> {
        SqlGenerator::build_where_clause(&self.conditions, &self.column_types, first_param)
    }

    pub fn build_order_clause(&self) -> Result<String, ValidationError> {
        SqlGenerator::build_order_clause(&self.order_by)
    }

    pub fn build_limit_clause(&self) -> String {
        SqlGenerator::build_limit_clause(self.limit, self.offset)
    }

    /// Build complete query parts with placeholders starting at `$1`
    pub fn build(&self) -> Result<QueryParts, ValidationError> {
        let (where_clause, values) = self.build_where_clause(1)?;
        let order_clause = self.build_order_clause()?;
        let limit_clause = self.build_limit_clause();

        Ok((where_clause, order_clause, limit_clause, values))
    }
}
