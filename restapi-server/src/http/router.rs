//! Insertion-ordered route table
//!
//! Routes match on exact method and exact path. The first registered entry
//! that matches wins; nothing else is consulted.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;

use super::error::ApiError;

type BoxedHandler = Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<u8>, ApiError>> + Send + Sync>;

/// A registered `(method, path, handler)` triple.
pub struct RouteEntry {
    method: Method,
    path: String,
    handler: BoxedHandler,
}

impl RouteEntry {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && self.path == path
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. `handler` takes no arguments; its output is sent as JSON.
    pub fn add<F, Fut, T>(&mut self, method: Method, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let handler: BoxedHandler = Arc::new(move || {
            let fut = handler();
            async move {
                let value = fut.await?;
                Ok::<_, ApiError>(serde_json::to_vec(&value)?)
            }
            .boxed()
        });

        self.routes.push(RouteEntry {
            method,
            path: path.into(),
            handler,
        });
        self
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// First entry matching `method` and `path` exactly.
    pub fn find(&self, method: &Method, path: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|route| route.matches(method, path))
    }

    /// Match, invoke, and encode. Unmatched requests get a JSON 404.
    pub async fn dispatch(&self, method: &Method, path: &str) -> Response {
        let Some(route) = self.find(method, path) else {
            tracing::debug!(%method, path, "no matching route");
            return ApiError::RouteNotFound {
                method: method.clone(),
                path: path.to_owned(),
            }
            .into_response();
        };

        match (route.handler)().await {
            Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(err) => err.into_response(),
        }
    }
}
