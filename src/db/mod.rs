//! Database bootstrap
//!
//! Creates the SQLite database on first run, applies connection PRAGMAs, and
//! creates the schema idempotently. All statements are safe to re-run against
//! an existing database.

pub mod weights;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// Open (creating if needed) the database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while a writer holds the upsert
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_weight_table(&pool).await?;

    Ok(pool)
}

/// Create the weight table and its index if they do not exist
///
/// Column names match the client wire format; `uuid` is the idempotency key.
pub async fn create_weight_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weight (
            uuid           TEXT PRIMARY KEY,
            startDate      TEXT NOT NULL,
            endDate        TEXT NOT NULL,
            kg             REAL NOT NULL,
            sourceBundleId TEXT NOT NULL,
            createdAt      TEXT NOT NULL DEFAULT (datetime('now')),
            updatedAt      TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_weight_start_date ON weight(startDate)")
        .execute(pool)
        .await?;

    Ok(())
}
