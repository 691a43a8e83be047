//! # HTTP Client
//!
//! One [`ApiClient`] per process, shared by clone. It owns the connection
//! pool, the base URL and the bearer token of the signed-in customer.
//!
//! ## Request Pipeline
//! ```text
//! endpoint fn (cart.rs / ingredient.rs)
//!       │  method + path + optional JSON body
//!       ▼
//! ApiClient::send
//!       │  + x-request-id: <uuid v4>
//!       │  + Authorization: Bearer <token>   (when signed in)
//!       ▼
//! reqwest ──► backend
//!       │
//!       ├── 2xx, empty body → Value::Null
//!       ├── 2xx, JSON body  → Value
//!       └── 4xx/5xx         → ApiError::from_response(status, body)
//! ```
//!
//! There are no retries. A failed call fails once and the caller decides.

use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// REST client for the storefront backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Builds a client from validated settings.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url: config.normalized_base_url(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sets or clears the bearer token. Clones share the token.
    pub async fn set_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.trim().is_empty());
        debug!(signed_in = token.is_some(), "Updating API token");
        *self.token.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one request and returns the decoded JSON body.
    pub(crate) async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<Value> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, path = %path, %request_id, error = %e, "Request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        debug!(
            %method,
            path = %path,
            %request_id,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Backend responded"
        );

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &text);
            debug!(%request_id, kind = ?err.kind(), "Backend rejected request");
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Checks that an id can be used as one URL path segment.
pub(crate) fn path_segment<'a>(field: &str, id: &'a str) -> ApiResult<&'a str> {
    let id = id.trim();
    let invalid = id.is_empty()
        || id
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%' | '\\'));

    if invalid {
        return Err(ApiError::InvalidUrl(format!("{} is not a valid path segment: {:?}", field, id)));
    }
    Ok(id)
}
