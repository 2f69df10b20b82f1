//! Route registration organized by resource

pub mod health;
pub mod users;

use std::sync::Arc;

use crate::controller::UserController;
use crate::db::QueryExecutor;

use super::router::RouteTable;

/// Register every application route. Order matters: first match wins.
pub fn register_all<E>(table: &mut RouteTable, users: Arc<UserController<E>>)
where
    E: QueryExecutor + ?Sized + 'static,
{
    users::register(table, users);
    health::register(table);
}
