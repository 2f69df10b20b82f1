//! One-shot user listing without the HTTP layer

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use restapi_server::{Database, DatabaseConfig, UserController};

use crate::config::DatabaseArgs;

/// Arguments for the users command
#[derive(Parser, Debug)]
pub struct UsersArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Print every row of `Users` as a JSON array on stdout
pub async fn run_users(args: UsersArgs) -> Result<()> {
    let db = Arc::new(
        Database::connect(&DatabaseConfig::from(args.database))
            .await
            .context("Failed to connect to database")?,
    );

    let rows = UserController::new(db.clone()).get_users().await;
    db.close().await;
    let rows = rows.context("Failed to fetch users")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&rows)?
    } else {
        serde_json::to_string(&rows)?
    };
    println!("{}", json);
    Ok(())
}
