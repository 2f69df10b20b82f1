//! restapi - JSON over a relational store
//!
//! Entry point for the `restapi` binary:
//! - `serve` runs the HTTP API (`GET /users`, `GET /health`)
//! - `users` prints the same rows once and exits

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "restapi",
    author,
    version,
    about = "Serve rows from a relational store as JSON over HTTP"
)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Print all users as JSON and exit
    Users(commands::users::UsersArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed flags
    config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Users(args) => commands::run_users(args).await?,
    }
    Ok(())
}
