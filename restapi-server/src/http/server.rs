//! Axum server setup
//!
//! Server skeleton with:
//! - The route table as the only request handler
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C, then the connection is released

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::router::RouteTable;
use super::routes;
use crate::controller::UserController;
use crate::db::{Database, QueryExecutor};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
}

/// Wire the controller into a fresh route table.
pub fn route_table<E>(db: Arc<E>) -> RouteTable
where
    E: QueryExecutor + ?Sized + 'static,
{
    let mut table = RouteTable::new();
    routes::register_all(&mut table, Arc::new(UserController::new(db)));
    table
}

/// Mount `routes` as the fallback of an otherwise empty axum router, so
/// registration order alone decides which handler runs.
pub fn build_app(routes: RouteTable) -> Router {
    let state = AppState {
        routes: Arc::new(routes),
    };

    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dispatch(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    state.routes.dispatch(&method, uri.path()).await
}

/// Run the HTTP server until a shutdown signal, then close `db`.
///
/// # Example
///
/// ```ignore
/// let db = Database::connect(&DatabaseConfig::default()).await?;
/// run_server(db, ServerConfig::default()).await?;
/// ```
pub async fn run_server(db: Database, config: ServerConfig) -> Result<(), ServerError> {
    let db = Arc::new(db);
    let app = build_app(route_table(db.clone()));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db.close().await;
    served?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::db::testing::RecordingExecutor;
    use crate::db::{Row, Value};

    fn users_table() -> Arc<RecordingExecutor> {
        Arc::new(RecordingExecutor::with_rows(vec![
            Row::new(vec![("id".into(), Value::Int(1)), ("name".into(), "A".into())]),
            Row::new(vec![("id".into(), Value::Int(2)), ("name".into(), "B".into())]),
        ]))
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[tokio::test]
    async fn get_users_returns_rows_as_json() {
        let db = users_table();
        let app = build_app(route_table(db.clone()));

        let (status, content_type, body) = send(app, "GET", "/users").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, r#"[{"id":1,"name":"A"},{"id":2,"name":"B"}]"#);
        assert_eq!(db.statements(), vec!["SELECT * FROM Users".to_string()]);
    }

    #[tokio::test]
    async fn unmatched_requests_are_404_and_never_query() {
        let db = users_table();

        for (method, uri) in [("POST", "/users"), ("GET", "/other"), ("GET", "/users/")] {
            let app = build_app(route_table(db.clone()));
            let (status, content_type, body) = send(app, method, uri).await;

            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(content_type.as_deref(), Some("application/json"));
            let body: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(body["error"], "not_found");
        }
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn query_string_is_not_part_of_the_path() {
        let app = build_app(route_table(users_table()));
        let (status, _, _) = send(app, "GET", "/users?page=2").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn store_failure_is_generic_500() {
        let db = Arc::new(RecordingExecutor::failing("relation \"Users\" does not exist"));
        let app = build_app(route_table(db));

        let (status, _, body) = send(app, "GET", "/users").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("relation"));
    }

    #[tokio::test]
    async fn health_is_served_from_the_same_table() {
        let app = build_app(route_table(users_table()));
        let (status, _, body) = send(app, "GET", "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""status":"ok""#));
    }
}
