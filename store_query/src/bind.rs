//! Binding JSON values as PostgreSQL parameters
//!
//! Strings always bind as TEXT, whatever they look like. A column that holds
//! uuids or timestamps gets its placeholder cast through `column_type` on the
//! statement builders instead. Integers bind as INT4 when they fit and INT8
//! otherwise. Arrays and objects bind as JSONB.

use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::Postgres;

/// The PostgreSQL type a JSON value is sent as
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Param {
    Text(String),
    Int4(i32),
    Int8(i64),
    Float8(f64),
    Bool(bool),
    Null,
    Json(Value),
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Param::Text(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i32::try_from(i).map_or(Param::Int8(i), Param::Int4)
                } else if let Some(f) = n.as_f64() {
                    Param::Float8(f)
                } else {
                    Param::Text(n.to_string())
                }
            }
            Value::Bool(b) => Param::Bool(b),
            Value::Null => Param::Null,
            other @ (Value::Array(_) | Value::Object(_)) => Param::Json(other),
        }
    }
}

macro_rules! bind_param {
    ($query:expr, $param:expr) => {
        match $param {
            Param::Text(s) => $query.bind(s),
            Param::Int4(i) => $query.bind(i),
            Param::Int8(i) => $query.bind(i),
            Param::Float8(f) => $query.bind(f),
            Param::Bool(b) => $query.bind(b),
            Param::Null => $query.bind(Option::<String>::None),
            Param::Json(v) => $query.bind(sqlx::types::Json(v)),
        }
    };
}

pub(crate) fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: Vec<Value>,
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = bind_param!(query, Param::from(param));
    }
    query
}

pub(crate) fn bind_all_as<'q, T>(
    mut query: QueryAs<'q, Postgres, T, PgArguments>,
    params: Vec<Value>,
) -> QueryAs<'q, Postgres, T, PgArguments>
where
    T: for<'r> sqlx::FromRow<'r, PgRow>,
{
    for param in params {
        query = bind_param!(query, Param::from(param));
    }
    query
}
