//! # Brasa CLI Library
//!
//! Startup and command dispatch for the `brasa` binary.
//!
//! ## Module Organization
//! ```text
//! brasa_cli/
//! ├── lib.rs        ◄─── You are here (startup & run)
//! ├── cli.rs        ◄─── clap definitions
//! ├── commands.rs   ◄─── One function per subcommand
//! ├── config.rs     ◄─── AppConfig (file → env → validate)
//! ├── render.rs     ◄─── Terminal output
//! └── error.rs      ◄─── CliError + exit codes
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration
//! 3. Open the local store & run migrations
//! 4. Build ApiClient + BasketStore
//! 5. Run one command

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use brasa_api::ApiClient;
use brasa_basket::BasketStore;
use brasa_store::{LocalStore, StoreConfig};

use cli::{Cli, Command};
use config::AppConfig;
use error::CliResult;

/// Runs one command and returns what to print.
pub async fn run(cli: Cli) -> CliResult<String> {
    if let Command::InitConfig = cli.command {
        return init_config(cli.config);
    }

    let config = AppConfig::load(cli.config)?;

    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");
    let local = LocalStore::new(StoreConfig::new(db_path)).await?;

    let client = ApiClient::new(&config.api)?;
    let basket = Arc::new(BasketStore::new(client, &local));

    let output = commands::execute(cli.command, &basket, &config.display).await;
    local.close().await;
    output
}

fn init_config(path: Option<PathBuf>) -> CliResult<String> {
    let path = match path.or_else(AppConfig::default_config_path) {
        Some(path) => path,
        None => return Err(error::CliError::NoConfigDir),
    };

    if path.exists() {
        let config = AppConfig::from_file(&path)?;
        config.validate()?;
        return Ok(format!("Config at {}\nAPI: {}", path.display(), config.api.base_url));
    }

    let path = AppConfig::default().save(Some(path))?;
    Ok(format!("Created default config at {}", path.display()))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=brasa=trace` - Show trace for brasa crates only
/// - Default: `info,brasa=debug,sqlx=warn`
///
/// Logs go to stderr so command output stays clean on stdout.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

const DEFAULT_LOG_FILTER: &str = "info,brasa=debug,sqlx=warn";

fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}
