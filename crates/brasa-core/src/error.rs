//! # Error Types
//!
//! Domain-specific error types for brasa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brasa-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Typed kind of a backend failure                │
//! │                                                                         │
//! │  brasa-store errors   └── StoreError   - Local storage failures        │
//! │  brasa-api errors     └── ApiError     - HTTP failures (carry ErrorKind)│
//! │  brasa-basket errors  └── BasketError  - What the screens see          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │        HTTP status + body → ApiError ┴─► BasketError → Screen          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Classifying Backend Failures
//! The backend reports failures with a status code and, sometimes, a machine
//! code or a Portuguese message. Classification happens in exactly one place,
//! [`ErrorKind::classify`], driven by the [`ERROR_CODE_TABLE`] mapping table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line item referenced by id is not part of the basket.
    #[error("Cart item not found: {0}")]
    ItemNotFound(String),

    /// The cart has more distinct lines than allowed.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any request leaves the device.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Error Kind
// =============================================================================

/// What went wrong on the backend, independent of how it was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Not enough stock for a product or ingredient.
    InsufficientStock,
    /// The session may not perform this operation.
    PermissionDenied,
    /// The request was rejected by backend validation.
    Validation,
    /// Missing or expired credentials.
    Unauthorized,
    /// The cart, item or ingredient does not exist.
    NotFound,
    /// Conflicting concurrent change.
    Conflict,
    /// The backend failed (5xx).
    Server,
    /// Anything the table does not recognise.
    Unknown,
}

/// How a table entry matches a failure report.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Exact machine code (`"code": "INSUFFICIENT_STOCK"`), case-insensitive.
    Code(&'static str),
    /// Substring of the human message, case-insensitive.
    Message(&'static str),
}

/// Explicit client-side mapping from backend codes/messages to kinds.
///
/// Entries are checked in order; the first match wins. Status-code fallbacks
/// live in [`ErrorKind::from_status`].
pub const ERROR_CODE_TABLE: &[(Matcher, ErrorKind)] = &[
    (Matcher::Code("INSUFFICIENT_STOCK"), ErrorKind::InsufficientStock),
    (Matcher::Code("OUT_OF_STOCK"), ErrorKind::InsufficientStock),
    (Matcher::Code("PERMISSION_DENIED"), ErrorKind::PermissionDenied),
    (Matcher::Code("FORBIDDEN"), ErrorKind::PermissionDenied),
    (Matcher::Code("VALIDATION_ERROR"), ErrorKind::Validation),
    (Matcher::Code("UNAUTHORIZED"), ErrorKind::Unauthorized),
    (Matcher::Code("TOKEN_EXPIRED"), ErrorKind::Unauthorized),
    (Matcher::Code("NOT_FOUND"), ErrorKind::NotFound),
    (Matcher::Message("INSUFFICIENT_STOCK"), ErrorKind::InsufficientStock),
    (Matcher::Message("estoque insuficiente"), ErrorKind::InsufficientStock),
    (Matcher::Message("permissão negada"), ErrorKind::PermissionDenied),
    (Matcher::Message("permission denied"), ErrorKind::PermissionDenied),
];

impl ErrorKind {
    /// Classifies a backend failure.
    ///
    /// ## Precedence
    /// 1. [`ERROR_CODE_TABLE`] against the machine code, then the message
    /// 2. HTTP status fallback
    ///
    /// ```rust
    /// use brasa_core::ErrorKind;
    ///
    /// let kind = ErrorKind::classify(400, None, Some("Estoque insuficiente para X-Bacon"));
    /// assert_eq!(kind, ErrorKind::InsufficientStock);
    ///
    /// assert_eq!(ErrorKind::classify(404, None, None), ErrorKind::NotFound);
    /// ```
    pub fn classify(status: u16, code: Option<&str>, message: Option<&str>) -> ErrorKind {
        let code = code.map(str::trim).filter(|c| !c.is_empty());
        let message = message.map(str::to_lowercase);

        for (matcher, kind) in ERROR_CODE_TABLE {
            let hit = match matcher {
                Matcher::Code(expected) => code.is_some_and(|c| c.eq_ignore_ascii_case(expected)),
                Matcher::Message(fragment) => message
                    .as_deref()
                    .is_some_and(|m| m.contains(&fragment.to_lowercase())),
            };
            if hit {
                return *kind;
            }
        }

        ErrorKind::from_status(status)
    }

    /// Maps an HTTP status on its own.
    pub fn from_status(status: u16) -> ErrorKind {
        match status {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::PermissionDenied,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }

    /// True for the failures the screens explicitly alert on.
    /// Everything else degrades quietly.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ErrorKind::InsufficientStock | ErrorKind::PermissionDenied | ErrorKind::Validation
        )
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CartTooLarge { max: 50 };
        assert_eq!(err.to_string(), "Cart cannot have more than 50 items");

        let err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        assert_eq!(err.to_string(), "product_id is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_classify_by_code() {
        assert_eq!(
            ErrorKind::classify(400, Some("INSUFFICIENT_STOCK"), None),
            ErrorKind::InsufficientStock
        );
        assert_eq!(
            ErrorKind::classify(500, Some("permission_denied"), None),
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_classify_by_message() {
        assert_eq!(
            ErrorKind::classify(500, None, Some("Erro: ESTOQUE INSUFICIENTE para Cheddar")),
            ErrorKind::InsufficientStock
        );
        assert_eq!(
            ErrorKind::classify(400, None, Some("failed: INSUFFICIENT_STOCK")),
            ErrorKind::InsufficientStock
        );
        assert_eq!(
            ErrorKind::classify(400, None, Some("Permissão negada")),
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_code_wins_over_message() {
        assert_eq!(
            ErrorKind::classify(400, Some("VALIDATION_ERROR"), Some("Estoque insuficiente")),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_status_fallback() {
        assert_eq!(ErrorKind::classify(422, None, Some("bad")), ErrorKind::Validation);
        assert_eq!(ErrorKind::classify(401, None, None), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::classify(403, Some(""), None), ErrorKind::PermissionDenied);
        assert_eq!(ErrorKind::classify(409, None, None), ErrorKind::Conflict);
        assert_eq!(ErrorKind::classify(503, None, None), ErrorKind::Server);
        assert_eq!(ErrorKind::classify(418, None, None), ErrorKind::Unknown);
    }

    #[test]
    fn test_user_facing_kinds() {
        assert!(ErrorKind::InsufficientStock.is_user_facing());
        assert!(ErrorKind::PermissionDenied.is_user_facing());
        assert!(ErrorKind::Validation.is_user_facing());
        assert!(!ErrorKind::Server.is_user_facing());
        assert!(!ErrorKind::NotFound.is_user_facing());
    }
}
