//! Database connection management and migrations.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Connect to the configured SQLite database and run migrations.
pub async fn connect(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    connect_url(&config.url, config.max_connections, config.min_connections).await
}

/// Connect to a SQLite URL and run migrations.
///
/// Connections are never recycled while idle, so a `sqlite::memory:` pool
/// with a single connection keeps its data for the lifetime of the pool.
/// Writers on other connections wait up to five seconds for the lock.
pub async fn connect_url(
    url: &str,
    max_connections: u32,
    min_connections: u32,
) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| AppError::Configuration(format!("invalid database url: {}", e)))?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .min_connections(min_connections.min(max_connections.max(1)))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::debug!(url, "database ready");

    Ok(pool)
}
