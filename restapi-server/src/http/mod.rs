//! HTTP layer
//!
//! Axum server with:
//! - An insertion-ordered route table mounted as the fallback service
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod router;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use router::RouteTable;
pub use server::{build_app, route_table, run_server, ServerConfig, ServerError};
