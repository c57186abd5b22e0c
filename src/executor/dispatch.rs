use std::sync::Arc;

use crate::connection::Connection;
use crate::error::SqlExecError;
use crate::results::{NormalizedResult, ResultFields, normalize_with};

/// Sends SQL to the connection and normalizes what comes back.
///
/// Shared by every operation of a [`QueryExec`](crate::QueryExec); the connection is
/// optional so that a missing one is reported as a configuration error on first use.
pub struct Executor {
    conn: Option<Arc<dyn Connection>>,
    fields: ResultFields,
}

// Manual Debug implementation because connection handles are not required to be `Debug`
impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field(
                "conn",
                &self.conn.as_ref().map(|conn| conn.driver_name().to_string()),
            )
            .field("fields", &self.fields)
            .finish()
    }
}

impl Executor {
    #[must_use]
    pub fn new(conn: Option<Arc<dyn Connection>>, fields: ResultFields) -> Self {
        Self { conn, fields }
    }

    #[must_use]
    pub fn has_connection(&self) -> bool {
        self.conn.is_some()
    }

    pub(crate) fn connection(&self) -> Result<Arc<dyn Connection>, SqlExecError> {
        self.conn.clone().ok_or(SqlExecError::NoConnection)
    }

    /// Run one statement and wait for its normalized result.
    ///
    /// # Errors
    /// Returns `SqlExecError::NoConnection` when no connection was supplied, or the
    /// driver's error for the statement.
    pub async fn execute(&self, sql: &str) -> Result<NormalizedResult, SqlExecError> {
        let conn = self.connection()?;
        self.submit(conn.as_ref(), sql).await
    }

    /// Submit a statement without waiting; `handler` receives the outcome exactly once.
    ///
    /// # Errors
    /// Returns `SqlExecError::NoConnection` or `SqlExecError::ConfigError` (no Tokio
    /// runtime) synchronously, in which case `handler` is never called. Driver failures
    /// are only ever passed to `handler`.
    pub fn exec<F>(self: &Arc<Self>, sql: String, handler: F) -> Result<(), SqlExecError>
    where
        F: FnOnce(Result<NormalizedResult, SqlExecError>) + Send + 'static,
    {
        let conn = self.connection()?;
        let runtime = current_runtime()?;
        let this = Arc::clone(self);
        runtime.spawn(async move {
            let outcome = this.submit(conn.as_ref(), &sql).await;
            handler(outcome);
        });
        Ok(())
    }

    pub(crate) async fn submit(
        &self,
        conn: &dyn Connection,
        sql: &str,
    ) -> Result<NormalizedResult, SqlExecError> {
        tracing::debug!(driver = conn.driver_name(), sql, "executing statement");
        match conn.query(sql).await {
            Ok(raw) => Ok(normalize_with(raw, &self.fields)),
            Err(err) => {
                tracing::warn!(driver = conn.driver_name(), sql, error = %err, "statement failed");
                Err(err)
            }
        }
    }
}

pub(crate) fn current_runtime() -> Result<tokio::runtime::Handle, SqlExecError> {
    tokio::runtime::Handle::try_current().map_err(|_| {
        SqlExecError::ConfigError("query execution requires a running Tokio runtime".into())
    })
}
