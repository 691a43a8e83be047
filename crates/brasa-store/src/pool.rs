//! # Local Store Pool
//!
//! Connection pool creation and configuration for the session database.
//!
//! ```text
//! StoreConfig::new(path)            StoreConfig::in_memory()
//!        │                                 │
//!        └──────────────┬──────────────────┘
//!                       ▼
//!          LocalStore::new(config).await   ← pool + migrations
//!                       │
//!                       ▼
//!          store.session()  → SessionRepository
//! ```
//!
//! The file database runs in WAL mode. The in-memory database keeps its single
//! connection alive for the lifetime of the pool, since closing it drops the data.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::session::SessionRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Local store configuration.
///
/// ```rust
/// use brasa_store::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/brasa.db").max_connections(2);
/// assert_eq!(config.max_connections, 2);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite file. `None` means in-memory.
    pub database_path: Option<PathBuf>,

    /// Default: 2. The client does a handful of writes per session.
    pub max_connections: u32,

    /// Default: 10 seconds.
    pub connect_timeout: Duration,

    /// Default: true.
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Configuration for a file database. The file and its parent directory
    /// are created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: Some(path.into()),
            max_connections: 2,
            connect_timeout: Duration::from_secs(10),
            run_migrations: true,
        }
    }

    /// Isolated in-memory database, for tests.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: None,
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }
}

// =============================================================================
// Local Store
// =============================================================================

/// Handle to the session database.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Opens the database and applies pending migrations.
    pub async fn new(config: StoreConfig) -> StoreResult<Self> {
        let pool = match &config.database_path {
            Some(path) => {
                info!(path = %path.display(), "Opening local store");

                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
                }

                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
                    .create_if_missing(true);

                SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.connect_timeout)
                    .connect_with(options)
                    .await
                    .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            }
            None => {
                debug!("Opening in-memory local store");

                let options = SqliteConnectOptions::from_str("sqlite::memory:")
                    .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .acquire_timeout(config.connect_timeout)
                    .connect_with(options)
                    .await
                    .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            }
        };

        let store = LocalStore { pool };

        if config.run_migrations {
            migrations::run_migrations(&store.pool).await?;
        }

        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the session repository.
    pub fn session(&self) -> SessionRepository {
        SessionRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing local store");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = LocalStore::new(StoreConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);

        let (total, applied) = migrations::migration_status(store.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("brasa.db");

        let store = LocalStore::new(StoreConfig::new(&path)).await.unwrap();
        assert!(store.health_check().await);
        assert!(path.exists());
        store.close().await;
    }

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/x.db").max_connections(0).run_migrations(false);
        assert_eq!(config.max_connections, 1);
        assert!(!config.run_migrations);
        assert!(StoreConfig::in_memory().database_path.is_none());
    }
}
