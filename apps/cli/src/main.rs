//! # Brasa CLI Entry Point
//!
//! ```text
//! brasa add 10 --qty 2 --extra 3:1 --notes "sem cebola"
//!   │
//!   ├── init_tracing
//!   ├── AppConfig::load (file → env → validate)
//!   ├── LocalStore + ApiClient + BasketStore
//!   └── commands::execute ──► stdout
//! ```

use std::process::ExitCode;

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    brasa_cli::init_tracing();

    let cli = brasa_cli::cli::parse();
    match brasa_cli::run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
