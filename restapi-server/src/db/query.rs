//! Fluent `SELECT` builder
//!
//! Every chaining call consumes the builder and returns a new one, so a
//! partially built query can be cloned and extended without aliasing.
//!
//! ```ignore
//! let rows = db.query().table("Users").select(["id", "name"]).get().await?;
//! ```
//!
//! Table and column names are trusted identifiers, never user input. They are
//! still checked against a conservative identifier grammar before rendering.
//! Filter values are always sent as bound parameters.

use std::fmt;

use super::executor::QueryExecutor;
use super::row::{Row, Value};
use super::DbError;

const WILDCARD: &str = "*";

/// Builder misuse detected before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("no table set; call table() before get()")]
    MissingTable,

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("'*' cannot be combined with other columns")]
    WildcardWithColumns,
}

/// The accumulated, not yet executed description of a read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    table: Option<String>,
    columns: Vec<String>,
    filters: Vec<(String, Value)>,
}

/// A rendered statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QuerySpec {
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Projected columns. Empty means all columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Render `SELECT <columns> FROM <table>[ WHERE ...]`.
    pub fn to_sql(&self) -> Result<Statement, QueryError> {
        let table = self.table.as_deref().ok_or(QueryError::MissingTable)?;
        validate_identifier(table)?;

        let projection = self.render_columns()?;
        let mut sql = format!("SELECT {} FROM {}", projection, table);
        let mut params = Vec::with_capacity(self.filters.len());

        for (i, (column, value)) in self.filters.iter().enumerate() {
            validate_identifier(column)?;
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            if *value == Value::Null {
                sql.push_str(&format!("{} IS NULL", column));
            } else {
                params.push(value.clone());
                sql.push_str(&format!("{} = ${}", column, params.len()));
            }
        }

        Ok(Statement { sql, params })
    }

    fn render_columns(&self) -> Result<String, QueryError> {
        match self.columns.as_slice() {
            [] => Ok(WILDCARD.to_owned()),
            [only] if only == WILDCARD => Ok(WILDCARD.to_owned()),
            columns => {
                for column in columns {
                    if column == WILDCARD {
                        return Err(QueryError::WildcardWithColumns);
                    }
                    validate_identifier(column)?;
                }
                Ok(columns.join(", "))
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// `name` or `schema.name`, each part ASCII alphanumeric or `_`, not starting with a digit.
fn validate_identifier(ident: &str) -> Result<(), QueryError> {
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    let mut parts = ident.split('.');
    let ok = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), None, _) => valid_part(name),
        (Some(schema), Some(name), None) => valid_part(schema) && valid_part(name),
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier(ident.to_owned()))
    }
}

/// Query builder bound to an executor.
pub struct QueryBuilder<'a, E: ?Sized> {
    executor: &'a E,
    spec: QuerySpec,
}

impl<E: ?Sized> Clone for QueryBuilder<'_, E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor,
            spec: self.spec.clone(),
        }
    }
}

impl<'a, E: QueryExecutor + ?Sized> QueryBuilder<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self {
            executor,
            spec: QuerySpec::default(),
        }
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.spec.table = Some(name.into());
        self
    }

    /// Project `columns`. An empty list selects every column.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add `column = value` (or `column IS NULL`), ANDed with earlier filters.
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.spec.filters.push((column.into(), value.into()));
        self
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Run the query once and return its rows in store order.
    ///
    /// # Errors
    ///
    /// [`DbError::Query`] if the query cannot be rendered (nothing is sent),
    /// otherwise whatever the executor reports.
    pub async fn get(self) -> Result<Vec<Row>, DbError> {
        let statement = self.spec.to_sql()?;
        tracing::debug!(sql = %statement, params = statement.params.len(), "executing query");
        self.executor
            .fetch_all(&statement.sql, &statement.params)
            .await
    }
}
