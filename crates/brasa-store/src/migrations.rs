//! # Local Store Migrations
//!
//! SQL files under `migrations/sqlite/` at the workspace root are embedded
//! into the binary at compile time and applied on startup.
//!
//! ## Adding New Migrations
//!
//! 1. Add `NNN_description.sql` with the next sequence number
//! 2. Use `IF NOT EXISTS` where possible
//! 3. **NEVER** modify an applied migration

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> StoreResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
