//! Health check endpoint

use axum::http::Method;
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::router::RouteTable;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
async fn health() -> Result<HealthResponse, ApiError> {
    Ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health routes
pub fn register(table: &mut RouteTable) {
    table.add(Method::GET, "/health", health);
}
