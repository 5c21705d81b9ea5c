use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::config::Config;
use crate::schema;
use crate::store::sqlite::SqliteStore;

pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open content store: {}", db_path.display()))?;

    Ok(pool)
}

/// Connect to the configured content store, creating its schema if needed.
pub async fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = connect(&config.db.path).await?;
    schema::apply(&pool).await?;
    Ok(SqliteStore::new(pool))
}
