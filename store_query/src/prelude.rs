//! Convenience re-exports for operations written against the query facade

pub use crate::errors::{StoreError, NO_ROWS_MESSAGE};
pub use crate::facade::{DeleteQuery, InsertQuery, QueryFacade, SelectQuery, UpdateQuery};
pub use crate::outcome::ExecOutcome;
pub use crate::query_builder::{PaginationParams, QueryBuilder, QueryFilter, SortOrder};
pub use crate::validation::{Identifier, ValidationError};

pub use serde::{Deserialize, Serialize};
pub use sqlx::{FromRow, PgPool};
