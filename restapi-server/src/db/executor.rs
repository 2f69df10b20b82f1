//! Query execution seam

use async_trait::async_trait;

use super::query::QueryBuilder;
use super::row::{Row, Value};
use super::DbError;

/// Anything that can run a rendered statement and hand back rows.
///
/// [`super::Database`] is the production implementation. Every statement is
/// executed exactly once per call, and rows come back in store order.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `sql` with positional `params` (`$1`, `$2`, ...) and collect all rows.
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError>;

    /// Start a query against this executor.
    fn query(&self) -> QueryBuilder<'_, Self>
    where
        Self: Sized,
    {
        QueryBuilder::new(self)
    }
}
