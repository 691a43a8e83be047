//! # Session Repository
//!
//! Reads and writes the persisted session keys.
//!
//! | Key             | Value                         | Written by                  |
//! |-----------------|-------------------------------|-----------------------------|
//! | `guest_cart_id` | server cart id (plain text)   | first add as a guest        |
//! | `user_token`    | bearer token                  | login                       |
//! | `user_data`     | customer profile (JSON)       | login                       |
//!
//! Clearing the basket removes `guest_cart_id`; logging out removes the token
//! and the profile.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

pub const GUEST_CART_ID_KEY: &str = "guest_cart_id";
pub const USER_TOKEN_KEY: &str = "user_token";
pub const USER_DATA_KEY: &str = "user_data";

/// Repository for the `local_state` table.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    // =========================================================================
    // Raw Key/Value Access
    // =========================================================================

    /// Returns the stored value for `key`.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM local_state WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Inserts or replaces the value for `key`.
    pub async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key = %key, "Writing local state");

        sqlx::query(
            r#"
            INSERT INTO local_state (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes `key`. Returns whether a value was present.
    pub async fn delete(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM local_state WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Guest Cart
    // =========================================================================

    pub async fn guest_cart_id(&self) -> StoreResult<Option<String>> {
        self.get(GUEST_CART_ID_KEY).await
    }

    pub async fn set_guest_cart_id(&self, cart_id: &str) -> StoreResult<()> {
        self.put(GUEST_CART_ID_KEY, cart_id).await
    }

    pub async fn clear_guest_cart_id(&self) -> StoreResult<()> {
        self.delete(GUEST_CART_ID_KEY).await.map(|_| ())
    }

    // =========================================================================
    // Signed-in Customer
    // =========================================================================

    pub async fn user_token(&self) -> StoreResult<Option<String>> {
        self.get(USER_TOKEN_KEY).await
    }

    pub async fn set_user_token(&self, token: &str) -> StoreResult<()> {
        self.put(USER_TOKEN_KEY, token).await
    }

    /// Returns the stored customer profile.
    ///
    /// A profile that no longer decodes as `T` is an error, not `None`.
    pub async fn user_data<T: DeserializeOwned>(&self) -> StoreResult<Option<T>> {
        match self.get(USER_DATA_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::invalid_value(USER_DATA_KEY, e)),
            None => Ok(None),
        }
    }

    pub async fn set_user_data<T: Serialize>(&self, data: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(data).map_err(|e| StoreError::invalid_value(USER_DATA_KEY, e))?;
        self.put(USER_DATA_KEY, &raw).await
    }

    /// Logout: removes the token and the profile. The guest cart id stays.
    pub async fn clear_session(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM local_state WHERE key IN (?1, ?2)")
            .bind(USER_TOKEN_KEY)
            .bind(USER_DATA_KEY)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
