//! # CLI Error Type
//!
//! Everything a command can fail with, plus a one-line rendering for the
//! terminal. The exit code tells scripts whether the failure was the
//! customer's to fix (2) or not (1).

use std::path::PathBuf;

use thiserror::Error;

use brasa_api::ApiError;
use brasa_basket::BasketError;
use brasa_store::StoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    ConfigSave(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not determine the platform config directory")]
    NoConfigDir,

    #[error(transparent)]
    Basket(#[from] BasketError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CliError {
    /// Exit code for the process.
    pub fn exit_code(&self) -> u8 {
        let user_facing = match self {
            CliError::Basket(err) => err.is_user_facing(),
            CliError::Api(err) => err.is_user_facing(),
            CliError::InvalidConfig(_) | CliError::ConfigParse(_) => true,
            _ => false,
        };
        if user_facing {
            2
        } else {
            1
        }
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::ConfigSave(err.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;
