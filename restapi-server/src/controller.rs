//! User endpoints' data access
//!
//! Thin adapters over the query builder. No validation, no paging.

use std::sync::Arc;

use crate::db::{DbError, QueryBuilder, QueryExecutor, Row};

const USERS_TABLE: &str = "Users";

/// Controller for the `Users` table.
pub struct UserController<E: ?Sized> {
    db: Arc<E>,
}

impl<E: QueryExecutor + ?Sized> UserController<E> {
    pub fn new(db: Arc<E>) -> Self {
        Self { db }
    }

    /// Every row of `Users`, unchanged and in store order.
    pub async fn get_users(&self) -> Result<Vec<Row>, DbError> {
        QueryBuilder::new(self.db.as_ref())
            .table(USERS_TABLE)
            .select(["*"])
            .get()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::RecordingExecutor;
    use crate::db::Value;

    #[tokio::test]
    async fn get_users_selects_everything_from_users() {
        let rows = vec![Row::new(vec![("id".into(), Value::Int(1))])];
        let db = Arc::new(RecordingExecutor::with_rows(rows.clone()));
        let controller = UserController::new(db.clone());

        assert_eq!(controller.get_users().await.unwrap(), rows);
        assert_eq!(db.statements(), vec!["SELECT * FROM Users".to_string()]);
    }

    #[tokio::test]
    async fn get_users_propagates_store_errors() {
        let db = Arc::new(RecordingExecutor::failing("connection reset"));
        let controller = UserController::new(db);

        assert!(matches!(controller.get_users().await, Err(DbError::Sqlx(_))));
    }
}
