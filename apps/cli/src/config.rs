//! # App Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BRASA_API_URL, BRASA_API_TIMEOUT                                   │
//! │     BRASA_DB_PATH, BRASA_CURRENCY_SYMBOL                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/brasa/config.toml (Linux)                                │
//! │     ~/Library/Application Support/com.brasa.brasa/config.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.brasa.example/api"
//! timeout_secs = 15
//!
//! [store]
//! db_path = "/var/lib/brasa/state.db"
//!
//! [display]
//! currency_symbol = "R$"
//! decimal_separator = ","
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use brasa_api::ClientConfig;

use crate::error::{CliError, CliResult};

pub const DB_PATH_ENV: &str = "BRASA_DB_PATH";
pub const CURRENCY_SYMBOL_ENV: &str = "BRASA_CURRENCY_SYMBOL";

const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "brasa.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "brasa", "brasa")
}

// =============================================================================
// Store Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Local database file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

// =============================================================================
// Display Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            currency_symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

impl DisplayConfig {
    /// Formats a cent amount as a currency string.
    ///
    /// ```rust
    /// use brasa_cli::config::DisplayConfig;
    ///
    /// let display = DisplayConfig::default();
    /// assert_eq!(display.format_currency(1234), "R$ 12,34");
    /// assert_eq!(display.format_currency(-5), "-R$ 0,05");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.unsigned_abs();
        let symbol = if self.currency_symbol.is_empty() {
            String::new()
        } else {
            format!("{} ", self.currency_symbol)
        };

        format!(
            "{}{}{}{}{:02}",
            sign,
            symbol,
            cents / 100,
            self.decimal_separator,
            cents % 100
        )
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api")]
    pub api: ClientConfig,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_api() -> ClientConfig {
    ClientConfig::default()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api: default_api(),
            store: StoreSettings::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file and returns where it went.
    pub fn save(&self, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(CliError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CliError::ConfigSave(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| CliError::ConfigSave(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any variable source.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        self.api.apply_overrides(&var);

        if let Some(path) = var(DB_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            debug!(%path, "Database path overridden from environment");
            self.store.db_path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = var(CURRENCY_SYMBOL_ENV) {
            self.display.currency_symbol = symbol.trim().to_string();
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        self.api
            .validate()
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?;

        if self.display.decimal_separator.chars().count() != 1 {
            return Err(CliError::InvalidConfig(format!(
                "decimal_separator must be a single character, got: '{}'",
                self.display.decimal_separator
            )));
        }

        Ok(())
    }

    /// Where the config file lives on this platform.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// The local database file: configured path or the platform data directory.
    pub fn database_path(&self) -> CliResult<PathBuf> {
        if let Some(path) = &self.store.db_path {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DB_FILE))
            .ok_or(CliError::NoConfigDir)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency() {
        let display = DisplayConfig::default();
        assert_eq!(display.format_currency(1234), "R$ 12,34");
        assert_eq!(display.format_currency(100), "R$ 1,00");
        assert_eq!(display.format_currency(1), "R$ 0,01");
        assert_eq!(display.format_currency(0), "R$ 0,00");
        assert_eq!(display.format_currency(-1234), "-R$ 12,34");

        let display = DisplayConfig {
            currency_symbol: "$".into(),
            decimal_separator: ".".into(),
        };
        assert_eq!(display.format_currency(250075), "$ 2500.75");
    }

    #[test]
    fn test_load_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://api.brasa.example/api"

[display]
currency_symbol = "BRL"
"#,
        )
        .unwrap();

        let mut config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.api.base_url, "https://api.brasa.example/api");
        assert_eq!(config.api.timeout_secs, ClientConfig::default().timeout_secs);
        assert_eq!(config.display.currency_symbol, "BRL");
        assert_eq!(config.display.decimal_separator, ",");

        config.apply_overrides(vars(&[
            ("BRASA_API_URL", "http://localhost:4000/api"),
            ("BRASA_DB_PATH", "/tmp/brasa-test.db"),
            ("BRASA_CURRENCY_SYMBOL", " R$ "),
        ]));
        assert_eq!(config.api.base_url, "http://localhost:4000/api");
        assert_eq!(config.store.db_path, Some(PathBuf::from("/tmp/brasa-test.db")));
        assert_eq!(config.display.currency_symbol, "R$");
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/brasa-test.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.display.decimal_separator = "".into();
        assert!(matches!(config.validate(), Err(CliError::InvalidConfig(_))));

        let mut config = AppConfig::default();
        config.api.base_url = "ftp://nope".into();
        assert!(matches!(config.validate(), Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.store.db_path = Some(dir.path().join("state.db"));
        let saved_to = config.save(Some(path.clone())).unwrap();

        assert_eq!(saved_to, path);
        assert_eq!(AppConfig::load(Some(path)).unwrap().store, config.store);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        assert!(matches!(AppConfig::from_file(&path), Err(CliError::ConfigParse(_))));
        assert!(matches!(AppConfig::load(Some(path)), Err(CliError::ConfigParse(_))));
    }
}
