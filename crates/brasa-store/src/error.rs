//! # Store Error Types
//!
//! ```text
//! sqlx::Error / MigrateError / serde_json::Error
//!       │
//!       ▼
//! StoreError (this module)
//!       │
//!       ▼
//! BasketError::Storage (brasa-basket)
//! ```

use thiserror::Error;

/// Local storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or created.
    ///
    /// ## When This Occurs
    /// - Parent directory missing or read-only
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored value could not be encoded or decoded.
    #[error("Stored value for '{key}' is invalid: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn invalid_value(key: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::InvalidValue {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

/// ```text
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
