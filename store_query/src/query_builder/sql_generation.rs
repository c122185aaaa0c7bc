//! SQL text generation for query builder parts
//!
//! Values never appear in the generated text: each one becomes a `$n`
//! placeholder and is returned alongside the SQL for binding, in order.
//! Strings bind as text, so a column of another type (uuid, timestamptz)
//! needs its type registered in [`ColumnTypes`] to get `$n::type`.

use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::ordering::SortOrder;
use crate::validation::{Identifier, SqlType, ValidationError};
use serde_json::Value;
use std::collections::BTreeMap;

/// Column name to the SQL type its parameters are cast to
pub type ColumnTypes = BTreeMap<String, String>;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build a WHERE clause whose placeholders start at `$first_param`.
    ///
    /// UPDATE statements bind their SET values first, so the WHERE numbering
    /// has to continue after them.
    pub fn build_where_clause(
        conditions: &[QueryFilter],
        column_types: &ColumnTypes,
        first_param: usize,
    ) -> Result<(String, Vec<Value>), ValidationError> {
        if conditions.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut values = Vec::new();
        let mut param_counter = first_param;

        let conditions_sql = conditions
            .iter()
            .map(|condition| {
                Self::build_condition_sql(condition, column_types, &mut values, &mut param_counter)
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(" AND ");

        Ok((format!("WHERE {}", conditions_sql), values))
    }

    fn build_condition_sql(
        filter: &QueryFilter,
        column_types: &ColumnTypes,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> Result<String, ValidationError> {
        match filter {
            QueryFilter::Condition(condition) => {
                Self::build_single_condition_sql(condition, column_types, values, param_counter)
            }
            QueryFilter::Group { operator, filters } if filters.is_empty() => {
                // Neutral element of the group's operator
                Ok(match operator {
                    LogicalOperator::And => "1=1".to_string(),
                    LogicalOperator::Or => "1=0".to_string(),
                })
            }
            QueryFilter::Group { operator, filters } => {
                let group_conditions = filters
                    .iter()
                    .map(|f| Self::build_condition_sql(f, column_types, values, param_counter))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(operator.joiner());

                Ok(format!("({})", group_conditions))
            }
        }
    }

    fn build_single_condition_sql(
        condition: &QueryCondition,
        column_types: &ColumnTypes,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> Result<String, ValidationError> {
        let field = Identifier::new(&condition.field)?.quoted();
        let sql_type = column_types.get(&condition.field).map(String::as_str);

        let sql = match (condition.operator, &condition.value) {
            (QueryOperator::IsNull, _) | (QueryOperator::Eq, None) => {
                format!("{} IS NULL", field)
            }
            (QueryOperator::IsNotNull, _) | (QueryOperator::Ne, None) => {
                format!("{} IS NOT NULL", field)
            }
            (QueryOperator::In, Some(Value::Array(items))) if items.is_empty() => {
                "1=0".to_string()
            }
            (QueryOperator::NotIn, Some(Value::Array(items))) if items.is_empty() => {
                "1=1".to_string()
            }
            (op @ (QueryOperator::In | QueryOperator::NotIn), Some(Value::Array(items))) => {
                let placeholders = items
                    .iter()
                    .map(|item| Self::push_param(item.clone(), sql_type, values, param_counter))
                    .collect::<Result<Vec<_>, _>>()?;
                let keyword = if op == QueryOperator::In { "IN" } else { "NOT IN" };
                format!("{} {} ({})", field, keyword, placeholders.join(", "))
            }
            (op, Some(value)) => match op.binary_sql() {
                Some(token) => {
                    let param = Self::push_param(value.clone(), sql_type, values, param_counter)?;
                    format!("{} {} {}", field, token, param)
                }
                // IN / NOT IN given a non-array value
                None => "1=0".to_string(),
            },
            // Comparison without a value matches nothing
            (_, None) => "1=0".to_string(),
        };

        Ok(sql)
    }

    fn push_param(
        value: Value,
        sql_type: Option<&str>,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> Result<String, ValidationError> {
        let param = Self::placeholder(*param_counter, sql_type)?;
        values.push(value);
        *param_counter += 1;
        Ok(param)
    }

    /// `$index`, cast to `sql_type` when one is given
    pub fn placeholder(index: usize, sql_type: Option<&str>) -> Result<String, ValidationError> {
        match sql_type {
            Some(name) => Ok(format!("${}::{}", index, SqlType::new(name)?.as_str())),
            None => Ok(format!("${}", index)),
        }
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> Result<String, ValidationError> {
        if order_by.is_empty() {
            return Ok(String::new());
        }

        let order_items = order_by
            .iter()
            .map(|(field, order)| {
                Identifier::new(field).map(|id| format!("{} {}", id.quoted(), order.to_sql()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!("ORDER BY {}", order_items.join(", ")))
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(limit: Option<i64>, offset: Option<i64>) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }
}
