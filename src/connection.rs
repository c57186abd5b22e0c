//! The capability a database driver must provide to be driven by the executor.

use async_trait::async_trait;

use crate::error::SqlExecError;
use crate::results::RawResult;

/// Submit SQL text and receive rows or a statement summary.
///
/// The executor never creates, pools or closes connections; whoever constructs the
/// [`QueryExec`](crate::QueryExec) owns the handle. Implementations that cannot run
/// statements concurrently must serialize internally.
///
/// ```rust
/// use async_trait::async_trait;
/// use sql_query_exec::prelude::*;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Connection for Echo {
///     async fn query(&self, sql: &str) -> Result<RawResult, SqlExecError> {
///         Ok(RawResult::summary([("affectedRows", RowValues::Int(sql.len() as i64))]))
///     }
/// }
/// ```
#[async_trait]
pub trait Connection: Send + Sync {
    /// Run one statement.
    ///
    /// # Errors
    /// Returns the driver's failure for the statement.
    async fn query(&self, sql: &str) -> Result<RawResult, SqlExecError>;

    /// Short driver name used in log records.
    fn driver_name(&self) -> &str {
        "unknown"
    }
}
