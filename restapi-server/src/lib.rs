//! restapi-server: a small JSON API over a relational store
//!
//! Three thin layers wired together by [`http::run_server`]:
//! - [`http::router::RouteTable`] dispatches `(method, path)` to a handler
//! - [`controller::UserController`] adapts a fixed query into a handler result
//! - [`db::QueryBuilder`] renders a `SELECT` and runs it on a [`db::Database`]

pub mod controller;
pub mod db;
pub mod http;

pub use controller::UserController;
pub use db::{Database, DatabaseConfig, DbError, QueryBuilder, QueryExecutor, Row, Value};
pub use http::{run_server, ApiError, RouteTable, ServerConfig};
