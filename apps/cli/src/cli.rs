use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "brasa")]
#[command(about = "Brasa burger basket from the terminal", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the basket
    Show {
        /// Re-fetch the cart from the backend first
        #[arg(long)]
        refresh: bool,
    },

    /// Add a product to the basket
    Add {
        /// Product id
        product: String,

        #[arg(long, default_value_t = 1)]
        qty: i64,

        /// Extra ingredient, repeatable (e.g. --extra 3:2)
        #[arg(long = "extra", value_name = "ID:QTY", value_parser = parse_pair)]
        extras: Vec<(String, i64)>,

        /// Change to the base recipe, repeatable (e.g. --modify 7:-1)
        #[arg(long = "modify", value_name = "ID:DELTA", value_parser = parse_pair, allow_hyphen_values = true)]
        modifications: Vec<(String, i64)>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Change the quantity of a line (0 removes it)
    SetQty { item: String, qty: i64 },

    /// Remove a line
    Remove { item: String },

    /// Empty the basket
    Clear,

    /// Check the basket can go to checkout
    Validate,

    /// Sign in and move the guest basket to the account
    Login {
        #[arg(long)]
        token: String,

        /// Display name stored with the session
        #[arg(long)]
        name: Option<String>,
    },

    /// Sign out and forget the basket
    Logout,

    /// Show config location, or create a default config if missing
    InitConfig,
}

/// Parses `id:n` pairs such as `3:2` or `7:-1`.
pub fn parse_pair(s: &str) -> Result<(String, i64), String> {
    let (id, n) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected ID:NUMBER, got '{}'", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing ingredient id in '{}'", s));
    }
    let n = n
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not a whole number", n))?;
    Ok((id.to_string(), n))
}

pub fn parse() -> Cli {
    Cli::parse()
}
