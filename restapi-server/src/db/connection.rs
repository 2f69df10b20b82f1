//! Database connection management
//!
//! Holds exactly one PostgreSQL connection for the lifetime of a [`Database`].
//! Requests share it through an async mutex: a query waits, without a
//! deadline, until the previous one finishes. A dropped connection is not
//! replaced; later queries fail until the process restarts.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection};
use sqlx::query::Query;
use sqlx::{ConnectOptions, Connection, Postgres};
use tokio::sync::Mutex;

use super::executor::QueryExecutor;
use super::row::{Row, Value};
use super::DbError;

/// Default time allowed for the initial connection.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection parameters.
///
/// With no `url`, sqlx falls back to the libpq environment
/// (`PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD`, `PGDATABASE`).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    /// Bounds only the initial connect, never a query.
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").ok(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl DatabaseConfig {
    fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        match &self.url {
            Some(url) => Ok(PgConnectOptions::from_str(url)?),
            None => Ok(PgConnectOptions::new()),
        }
    }
}

/// The process-lifetime database handle.
pub struct Database {
    conn: Mutex<Option<PgConnection>>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the server refuses the
    /// connection, or no connection is made within `connect_timeout`.
    /// Callers treat this as fatal.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Database::connect(&DatabaseConfig::default()).await?;
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let options = config.connect_options()?;

        let conn = tokio::time::timeout(config.connect_timeout, options.connect())
            .await
            .map_err(|_| DbError::ConnectTimeout(config.connect_timeout))??;

        tracing::info!("database connection established");
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Release the connection. Queries issued afterwards fail with [`DbError::Closed`].
    pub async fn close(&self) {
        let Some(conn) = self.conn.lock().await.take() else {
            return;
        };
        if let Err(e) = conn.close().await {
            tracing::warn!("error while closing database connection: {}", e);
        }
        tracing::info!("database connection closed");
    }

    pub async fn is_closed(&self) -> bool {
        self.conn.lock().await.is_none()
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.clone()),
    }
}

#[async_trait]
impl QueryExecutor for Database {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError> {
        let query = params
            .iter()
            .fold(sqlx::query::<Postgres>(sql), |query, value| bind_value(query, value));

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::Closed)?;
        let rows = query.fetch_all(&mut *conn).await?;
        rows.iter().map(Row::from_pg_row).collect()
    }
}
