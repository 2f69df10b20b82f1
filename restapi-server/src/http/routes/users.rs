//! User endpoints

use std::sync::Arc;

use axum::http::Method;

use crate::controller::UserController;
use crate::db::QueryExecutor;
use crate::http::error::ApiError;
use crate::http::router::RouteTable;

/// GET /users - every row of the `Users` table as a JSON array
pub fn register<E>(table: &mut RouteTable, controller: Arc<UserController<E>>)
where
    E: QueryExecutor + ?Sized + 'static,
{
    table.add(Method::GET, "/users", move || {
        let controller = controller.clone();
        async move { Ok::<_, ApiError>(controller.get_users().await?) }
    });
}
