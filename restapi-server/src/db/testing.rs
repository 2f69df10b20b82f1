//! In-memory executor for tests

use std::sync::Mutex;

use async_trait::async_trait;

use super::executor::QueryExecutor;
use super::row::{Row, Value};
use super::DbError;

/// Returns canned rows (or a canned failure) and records every statement.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    rows: Vec<Row>,
    failure: Option<String>,
    statements: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingExecutor {
    pub(crate) fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Default::default()
        }
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_owned(), params.to_vec()));

        match &self.failure {
            Some(message) => Err(DbError::Sqlx(sqlx::Error::Protocol(message.clone()))),
            None => Ok(self.rows.clone()),
        }
    }
}
