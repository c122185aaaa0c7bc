//! Query builder utilities
//!
//! This module provides SQL query construction utilities.

pub mod builder;
pub mod filter;
pub mod ordering;
pub mod pagination;
pub mod sql_generation;


pub use builder::{QueryBuilder, QueryParts};
pub use filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use ordering::SortOrder;
pub use pagination::{PaginationParams, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use sql_generation::ColumnTypes;
