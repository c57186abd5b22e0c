use std::time::Duration;

use serde::Deserialize;

use super::connection::SqliteConnection;
use crate::error::SqlExecError;

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    #[serde(default = "default_smoke_test")]
    pub smoke_test: bool,
    #[serde(default)]
    pub busy_timeout: Option<Duration>,
}

fn default_smoke_test() -> bool {
    true
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            smoke_test: default_smoke_test(),
            busy_timeout: None,
        }
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = Some(busy_timeout);
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    /// Run `SELECT 1` after opening (on by default).
    #[must_use]
    pub fn smoke_test(mut self, smoke_test: bool) -> Self {
        self.opts.smoke_test = smoke_test;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.opts.busy_timeout = Some(busy_timeout);
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open the connection.
    ///
    /// # Errors
    ///
    /// Returns `SqlExecError` if the database cannot be opened or the smoke test fails.
    pub async fn open(self) -> Result<SqliteConnection, SqlExecError> {
        SqliteConnection::open(self.finish()).await
    }
}

impl SqliteConnection {
    #[must_use]
    pub fn builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }
}
