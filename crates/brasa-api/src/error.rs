//! # API Error Type
//!
//! Every failed HTTP call ends up as an [`ApiError`].
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Backend Failure → ApiError                           │
//! │                                                                         │
//! │  HTTP 400 {"code": "INSUFFICIENT_STOCK", "message": "..."}              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError::from_response(status, body)                                  │
//! │       │   ErrorKind::classify(status, code, message)                    │
//! │       ▼                                                                 │
//! │  ApiError::Backend { kind: InsufficientStock, status: 400, .. }         │
//! │                                                                         │
//! │  Connection refused / timeout / bad JSON                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError::Transport / Timeout / Decode                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use brasa_core::wire::{self, Record};
use brasa_core::ErrorKind;
use serde_json::Value;
use thiserror::Error;

const CODE_KEYS: &[&str] = &["code", "error_code", "errorCode"];
const MESSAGE_KEYS: &[&str] = &["message", "error", "detail", "msg"];

/// Errors raised by the storefront REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Backend {
        kind: ErrorKind,
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never got a response.
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    /// The response body was not the JSON we expected.
    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Builds a backend error from a status and a raw response body.
    ///
    /// The body may be `{code, message}`, `{error: "..."}`,
    /// `{error: {code, message}}`, plain text, or empty.
    ///
    /// ```rust
    /// use brasa_api::ApiError;
    /// use brasa_core::ErrorKind;
    ///
    /// let err = ApiError::from_response(400, r#"{"message":"Estoque insuficiente"}"#);
    /// assert_eq!(err.kind(), ErrorKind::InsufficientStock);
    /// assert_eq!(err.status(), Some(400));
    /// ```
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Record> = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.as_object().cloned());

        let (code, message) = match &parsed {
            Some(record) => {
                let inner = wire::object(record, "error").unwrap_or(record);
                let code = wire::text(inner, CODE_KEYS).or_else(|| wire::text(record, CODE_KEYS));
                let message = wire::text(inner, MESSAGE_KEYS).or_else(|| wire::text(record, MESSAGE_KEYS));
                (code, message)
            }
            None => {
                let text = body.trim();
                (None, (!text.is_empty()).then(|| text.chars().take(200).collect::<String>()))
            }
        };

        let kind = ErrorKind::classify(status, code.as_deref(), message.as_deref());

        ApiError::Backend {
            kind,
            status,
            code,
            message: message.unwrap_or_else(|| "Request rejected".to_string()),
        }
    }

    /// The classified kind. Transport-level failures are `Unknown`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Backend { kind, .. } => *kind,
            _ => ErrorKind::Unknown,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for the failures the screens alert on (stock, permission, validation).
    pub fn is_user_facing(&self) -> bool {
        self.kind().is_user_facing()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// ```text
/// timeout           → ApiError::Timeout
/// builder (bad URL) → ApiError::InvalidUrl
/// body decode       → ApiError::Decode
/// other             → ApiError::Transport
/// ```
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_builder() {
            ApiError::InvalidUrl(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
