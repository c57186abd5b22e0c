use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::config::SqliteOptions;
use super::query::run_statement;
use crate::connection::Connection;
use crate::error::SqlExecError;
use crate::results::RawResult;

pub(crate) type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// A [`Connection`] over one `rusqlite` connection.
///
/// Statements run on the blocking thread pool, one at a time.
#[derive(Clone)]
pub struct SqliteConnection {
    conn: SharedSqliteConnection,
    db_path: String,
}

impl SqliteConnection {
    /// Open (or create) the database at `options.db_path`.
    ///
    /// # Errors
    /// Returns `SqlExecError` if the database cannot be opened or the smoke test fails.
    pub async fn open(options: SqliteOptions) -> Result<Self, SqlExecError> {
        let path = options.db_path.clone();
        let busy_timeout = options.busy_timeout;
        let conn = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&path)?;
            if let Some(timeout) = busy_timeout {
                conn.busy_timeout(timeout)?;
            }
            Ok::<_, SqlExecError>(conn)
        })
        .await??;

        let this = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: options.db_path,
        };
        if options.smoke_test {
            this.query("SELECT 1").await?;
        }
        tracing::debug!(db_path = %this.db_path, "opened sqlite connection");
        Ok(this)
    }

    /// Wrap an already open `rusqlite` connection.
    #[must_use]
    pub fn from_rusqlite(conn: rusqlite::Connection) -> Self {
        let db_path = conn
            .path()
            .filter(|path| !path.is_empty())
            .unwrap_or(":memory:")
            .to_string();
        Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
        }
    }

    #[must_use]
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Run several `;`-separated statements, e.g. schema setup. No results are reported.
    ///
    /// # Errors
    /// Returns `SqlExecError` if any statement fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), SqlExecError> {
        let sql = sql.to_owned();
        self.with_connection(move |conn| Ok(conn.execute_batch(&sql)?))
            .await
    }

    /// Run a closure against the underlying connection on the blocking pool.
    ///
    /// # Errors
    /// Returns the closure's error, or `SqlExecError::ExecutionError` if the blocking task
    /// could not complete.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SqlExecError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlExecError> + Send + 'static,
        R: Send + 'static,
    {
        run_blocking(Arc::clone(&self.conn), func).await
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    async fn query(&self, sql: &str) -> Result<RawResult, SqlExecError> {
        let sql = sql.to_owned();
        self.with_connection(move |conn| run_statement(conn, &sql))
            .await
    }

    fn driver_name(&self) -> &str {
        "sqlite"
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlExecError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlExecError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await?
}
