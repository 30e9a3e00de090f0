use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Shared SQLite handle. Both stores write through the same lock so that
/// every write in the process is serialized.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl Database {
    /// Opens (creating if missing) the database file and runs migrations.
    pub async fn connect(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        info!("Opening SQLite database at {}", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", path.display()))?;

        Self::from_pool(pool).await
    }

    /// Ephemeral single-connection database, used by tests and dry runs.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // one connection that never expires, otherwise the data goes with it
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let db = Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquires the process-wide writer lock. Hold it for the whole write transaction.
    pub async fn writer(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_context (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("user_context table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS job_descriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                job_title TEXT NOT NULL,
                company TEXT NOT NULL,
                description TEXT NOT NULL,
                optimized_resume TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                fingerprint TEXT,
                normalized_key TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("job_descriptions table")?;

        // Databases created before fingerprinting lack the lookup columns.
        let columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('job_descriptions')")
                .fetch_all(&self.pool)
                .await
                .context("job_descriptions columns")?;
        for column in ["fingerprint", "normalized_key"] {
            if !columns.iter().any(|c| c == column) {
                sqlx::query(&format!(
                    "ALTER TABLE job_descriptions ADD COLUMN {column} TEXT"
                ))
                .execute(&self.pool)
                .await
                .with_context(|| format!("adding job_descriptions.{column}"))?;
                info!("Added job_descriptions.{column}");
            }
        }

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_job_descriptions_fingerprint ON job_descriptions(fingerprint)",
        )
        .execute(&self.pool)
        .await
        .context("fingerprint index")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_user_context_category ON user_context(category, created_at)",
        )
        .execute(&self.pool)
        .await
        .context("category index")?;

        debug!("SQLite migrations complete");
        Ok(())
    }
}
