//! Database Module
//!
//! SQLite connection pool, embedded migrations and one repository module
//! per table. Repository functions are free async functions over an
//! executor, so the same query runs on the pool or inside a transaction.

pub mod addresses;
pub mod bottle_orders;
pub mod bottles;
pub mod orders;
pub mod payments;
pub mod stats;
pub mod users;

use shared::error::AppError;
use sqlx::{Sqlite, SqlitePool, Transaction};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Database service, owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file with WAL mode and apply migrations
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            // Wait up to 5s on write conflicts instead of failing immediately
            .busy_timeout(Duration::from_millis(5000))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(path = %db_path, "Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database, used by tests
    ///
    /// A single connection that never expires: every connection to
    /// `sqlite::memory:` is a separate database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::debug!("Database migrations applied");
        Ok(())
    }

    pub async fn ping(&self) -> bool {
        ping(&self.pool).await
    }
}

/// Transaction that takes the write lock at `BEGIN`
///
/// Deferred transactions that read before writing can fail to upgrade
/// under WAL contention; engine writes open with this instead.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Liveness probe
pub async fn ping(pool: &SqlitePool) -> bool {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = DbService::in_memory().await.unwrap();
        assert!(db.ping().await);
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' ORDER BY name",
        )
        .fetch_all(&db.pool)
        .await
        .unwrap();
        for table in ["address", "bottle", "bottle_order", "orders", "payment", "users"] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aqua.db");
        let path = path.to_str().unwrap();

        let db = DbService::new(path).await.unwrap();
        sqlx::query("INSERT INTO bottle (status, reuse_count, created_at) VALUES ('available', 0, 0)")
            .execute(&db.pool)
            .await
            .unwrap();
        db.pool.close().await;

        let db = DbService::new(path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bottle")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_open_link_unique_index() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query("INSERT INTO users (username, email, password_hash, created_at) VALUES ('c', 'c@x.io', 'h', 0)")
            .execute(&db.pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO address (title, user_id) VALUES ('Home', 1)")
            .execute(&db.pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO orders (customer_id, address_id, quantity, order_date, total_price) VALUES (1, 1, 2, 0, 40)")
            .execute(&db.pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO bottle (created_at) VALUES (0)")
            .execute(&db.pool)
            .await
            .unwrap();

        sqlx::query("INSERT INTO bottle_order (bottle_id, order_id) VALUES (1, 1)")
            .execute(&db.pool)
            .await
            .unwrap();
        let err = sqlx::query("INSERT INTO bottle_order (bottle_id, order_id) VALUES (1, 1)")
            .execute(&db.pool)
            .await
            .unwrap_err();
        assert!(matches!(RepoError::from(err), RepoError::Duplicate(_)));

        // A returned link does not block a new open one
        sqlx::query("UPDATE bottle_order SET returned_on = '2024-01-01' WHERE id = 1")
            .execute(&db.pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO bottle_order (bottle_id, order_id) VALUES (1, 1)")
            .execute(&db.pool)
            .await
            .unwrap();
    }
}
