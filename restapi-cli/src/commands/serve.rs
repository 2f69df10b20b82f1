//! HTTP server command
//!
//! Connects to the store, then serves the route table until shutdown.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use restapi_server::{run_server, Database, DatabaseConfig, ServerConfig};

use crate::config::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "RESTAPI_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting restapi server on {}", args.bind);

    // Connection failure is fatal: nothing is served without the store
    let db = Database::connect(&DatabaseConfig::from(args.database))
        .await
        .context("Failed to connect to database")?;

    let config = ServerConfig {
        bind_addr: args.bind,
    };

    // Run server (blocks until shutdown)
    run_server(db, config).await.context("Server error")?;

    Ok(())
}
