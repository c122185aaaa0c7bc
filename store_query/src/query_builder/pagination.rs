//! Pagination defaults for list operations
//!
//! `limit` and `offset` arrive as optional query parameters. List operations
//! call [`PaginationParams::fill_defaults`] once before building their query;
//! presence is never sanitized here, only absence is filled.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not send `limit`
pub const DEFAULT_LIMIT: i64 = 20;

/// Starting row used when the caller does not send `offset`
pub const DEFAULT_OFFSET: i64 = 0;

/// Offset/limit query parameters, both omittable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Fill each unset field with its default. Set fields, including negative
    /// or oversized ones, are left as they are.
    pub fn fill_defaults(&mut self) {
        self.limit.get_or_insert(DEFAULT_LIMIT);
        self.offset.get_or_insert(DEFAULT_OFFSET);
    }

    pub fn limit_or_default(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset_or_default(&self) -> i64 {
        self.offset.unwrap_or(DEFAULT_OFFSET)
    }

    pub fn to_sql(&self) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }
}
