//! Database access layer for moviedb
//!
//! The store is a single SQLite file. `create_database` builds it from scratch
//! (used on first run, before import); `open_database` attaches to one that
//! already exists. The first-run decision itself belongs to the process entry
//! point, which checks `store_exists` before either call.

use crate::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

pub mod schema;
pub use schema::create_schema;

/// Whether the store file already exists.
///
/// Checked before connecting: `mode=rwc` would create the file as a side
/// effect, which must only happen on the explicit first-run path.
pub fn store_exists(db_path: &Path) -> bool {
    db_path.exists()
}

/// Create a new store file and connect to it (mode=rwc).
pub async fn create_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // sqlx turns `PRAGMA foreign_keys` on by default; the schema deliberately
    // leaves it off so link rows with absent parents are accepted.
    let opts = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(false);
    let pool = SqlitePool::connect_with(opts).await?;

    info!("Initialized new database: {}", db_path.display());
    Ok(pool)
}

/// Connect to an existing store file.
pub async fn open_database(db_path: &Path) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::new()
        .filename(db_path)
        .foreign_keys(false);
    let pool = SqlitePool::connect_with(opts).await?;

    info!("Opened existing database: {}", db_path.display());
    Ok(pool)
}
