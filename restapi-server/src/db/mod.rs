//! Database layer - connection, query builder, and row model
//!
//! # Design Principles
//!
//! - One connection per process, owned by a [`Database`] value (no global state)
//! - Queries go through the [`QueryExecutor`] seam so callers never touch sqlx
//! - Filter values are always bound parameters; identifiers are validated

pub mod executor;
pub mod connection;
pub mod query;
pub mod row;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::QueryExecutor;
pub use connection::{Database, DatabaseConfig};
pub use query::{QueryBuilder, QueryError, QuerySpec, Statement};
pub use row::{Row, Value};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("no connection within {0:?}")]
    ConnectTimeout(std::time::Duration),

    #[error("database connection is closed")]
    Closed,

    #[error("unsupported type {type_name} for column '{column}'")]
    UnsupportedType { column: String, type_name: String },
}
