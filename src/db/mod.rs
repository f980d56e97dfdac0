//! Database layer for Trainstore.
//!
//! Provides SQLite connection pooling and query modules
//! for all domain entities.

mod projects;
mod training;

// Re-export all query modules
pub use projects::*;
pub use training::*;

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool.
///
/// Creates parent directories if needed and configures SQLite with
/// settings suitable for concurrent request handling.
pub async fn init_pool(path: &str) -> Result<DbPool> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // Configure connection options with pragmas for performance
    let options = SqliteConnectOptions::from_str(path)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30))
        // Enable foreign keys
        .foreign_keys(true)
        // Increase cache size (negative = KB)
        .pragma("cache_size", "-64000")
        // Temp store in memory
        .pragma("temp_store", "memory");

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(options)
        .await?;

    info!("Database pool initialized: {}", path);

    Ok(pool)
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    // Execute schema SQL (contains multiple statements)
    // Split by semicolons and execute each statement
    for statement in schema.split(';') {
        // Strip comment lines, keeping only actual SQL
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt).execute(pool).await?;
    }

    info!("Database schema initialized successfully");

    Ok(())
}
