use std::time::Duration;

use clap::Args;
use restapi_server::DatabaseConfig;
use tracing::debug;

/// Load `.env` from the current directory. Variables already set win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded .env from {}", path.display()),
        Err(e) => debug!("No .env loaded: {}", e),
    }
}

/// Database connection flags shared by every subcommand that touches the store
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database URL (falls back to PGHOST/PGUSER/PGPASSWORD/PGDATABASE)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Seconds to wait for the initial connection
    #[arg(long, default_value_t = 5)]
    pub connect_timeout_secs: u64,
}

impl From<DatabaseArgs> for DatabaseConfig {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            url: args.database_url,
            connect_timeout: Duration::from_secs(args.connect_timeout_secs),
        }
    }
}
