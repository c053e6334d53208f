//! SQLite connection pool and migration management.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{debug, info};

use super::entry::SqliteEntryRepository;
use crate::db::{Database, DbError, DbResult};

// Embed migrations from data/sql/sqlite/ at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./data/sql/sqlite");

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_CONNECTIONS: u32 = 5;

/// SQLite database implementation.
///
/// Provides access to repositories via associated types, avoiding dynamic dispatch.
/// Every statement checks a connection out of the pool and hands it back when
/// it completes, so no request holds a connection between statements.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (or create) a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: format!("{}: {}", path.display(), e),
            })?;

        info!(path = %path.display(), "opened database");
        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Each SQLite in-memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> DbResult<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        debug!("opened in-memory database");
        Ok(Self { pool })
    }

    /// Get the underlying pool.
    ///
    /// Useful for tests and operations that need direct database access.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Remove every entry and restart id assignment.
    ///
    /// Runs in one transaction; readers see either the old table or an empty one.
    pub async fn reset(&self) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM entries")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'entries'")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(removed, "reset entries table");
        Ok(())
    }
}

impl Database for SqliteDatabase {
    type Entries<'a> = SqliteEntryRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })?;

        debug!("migrations applied");
        Ok(())
    }

    fn entries(&self) -> Self::Entries<'_> {
        SqliteEntryRepository { pool: &self.pool }
    }
}
