//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! 1. Environment variables (highest priority)
//!      BRASA_API_URL=https://api.brasa.example/v1
//!      BRASA_API_TIMEOUT=15
//! 2. [api] section of the CLI's config.toml
//! 3. Defaults
//! ```
//!
//! ```toml
//! [api]
//! base_url = "https://api.brasa.example/v1"
//! timeout_secs = 15
//! connect_timeout_secs = 5
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

pub const API_URL_ENV: &str = "BRASA_API_URL";
pub const API_TIMEOUT_ENV: &str = "BRASA_API_TIMEOUT";

fn default_base_url() -> String {
    "http://localhost:3333/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("brasa-client/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Applies overrides from any variable source.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(API_URL_ENV) {
            debug!(url = %url, "Overriding API URL from environment");
            self.base_url = url;
        }

        if let Some(timeout) = var(API_TIMEOUT_ENV) {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid {}", API_TIMEOUT_ENV),
            }
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        let url = self.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ApiError::InvalidUrl("timeout_secs must be greater than 0".into()));
        }

        Ok(())
    }

    /// `base_url` trimmed, without a trailing slash.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim().trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}
