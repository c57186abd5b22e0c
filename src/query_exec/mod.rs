use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::ExecOptions;
use crate::connection::Connection;
use crate::error::SqlExecError;
use crate::executor::{Executor, PendingOperation};
use crate::query_builder::QueryBuilder;
use crate::results::NormalizedResult;
use crate::types::WhereClause;

mod dml;
mod select;

/// One method per data operation, each usable with a callback or as a future.
///
/// Methods validate their arguments, ask the [`QueryBuilder`] for SQL, reset the builder
/// and hand back a [`PendingOperation`]. Validation and SQL generation failures are
/// returned immediately; execution failures arrive through the chosen completion path.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sql_query_exec::prelude::*;
///
/// # async fn demo() -> Result<(), SqlExecError> {
/// let conn = SqliteConnection::open(SqliteOptions::new(":memory:".into())).await?;
/// let exec = QueryExec::new(BasicQueryBuilder::ansi_strings(), Arc::new(conn));
///
/// exec.query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?
///     .run()
///     .await?;
/// let res = exec
///     .insert("users", vec![("name".into(), RowValues::Text("alice".into()))])?
///     .run()
///     .await?;
/// assert_eq!(res.insert_id, Some(1));
/// assert_eq!(exec.count(Some("users"))?.run().await?, 1);
/// # Ok(()) }
/// ```
pub struct QueryExec<B> {
    executor: Arc<Executor>,
    builder: Arc<Mutex<B>>,
}

impl<B> std::fmt::Debug for QueryExec<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExec")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<B: QueryBuilder + 'static> QueryExec<B> {
    /// Executor over `conn` with default options.
    pub fn new(builder: B, conn: Arc<dyn Connection>) -> Self {
        Self::builder(builder).connection(conn).build()
    }

    pub fn builder(builder: B) -> QueryExecBuilder<B> {
        QueryExecBuilder::new(builder)
    }

    #[must_use]
    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    /// Stage builder state (columns, tables, conditions) for the next operation.
    ///
    /// ```rust,no_run
    /// # use sql_query_exec::prelude::*;
    /// # async fn demo(exec: &QueryExec<BasicQueryBuilder>) -> Result<(), SqlExecError> {
    /// exec.with_builder(|qb| {
    ///     qb.select(&["id", "name"]).where_clause(WhereClause::eq("active", true));
    /// });
    /// let active = exec.get(Some("users"))?.run().await?;
    /// # let _ = active;
    /// # Ok(()) }
    /// ```
    pub fn with_builder<R>(&self, func: impl FnOnce(&mut B) -> R) -> R {
        let mut guard = lock(&self.builder);
        func(&mut *guard)
    }

    /// Generate SQL with the builder, then clear its staged state.
    fn build<F>(&self, generate: F) -> Result<String, SqlExecError>
    where
        F: FnOnce(&mut B) -> Result<String, SqlExecError>,
    {
        let mut qb = lock(&self.builder);
        let sql = generate(&mut *qb)?;
        qb.reset_query(&sql);
        Ok(sql)
    }

    fn pending(&self, sql: String) -> PendingOperation<NormalizedResult> {
        PendingOperation::new(sql, Arc::clone(&self.executor))
    }
}

/// Fluent construction of a [`QueryExec`].
pub struct QueryExecBuilder<B> {
    builder: B,
    conn: Option<Arc<dyn Connection>>,
    options: ExecOptions,
}

impl<B> std::fmt::Debug for QueryExecBuilder<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecBuilder")
            .field("has_connection", &self.conn.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<B> QueryExecBuilder<B> {
    fn new(builder: B) -> Self {
        Self {
            builder,
            conn: None,
            options: ExecOptions::default(),
        }
    }

    #[must_use]
    pub fn connection(mut self, conn: Arc<dyn Connection>) -> Self {
        self.conn = Some(conn);
        self
    }

    #[must_use]
    pub fn options(mut self, options: ExecOptions) -> Self {
        self.options = options;
        self
    }

    /// Finish construction. A missing connection is reported by the first operation
    /// that tries to run, as `SqlExecError::NoConnection`.
    pub fn build(self) -> QueryExec<B> {
        QueryExec {
            executor: Arc::new(Executor::new(self.conn, self.options.result_fields)),
            builder: Arc::new(Mutex::new(self.builder)),
        }
    }
}

pub(crate) fn lock<B>(builder: &Mutex<B>) -> MutexGuard<'_, B> {
    match builder.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn require_table(table: &str) -> Result<(), SqlExecError> {
    if table.trim().is_empty() {
        Err(SqlExecError::NoTableName)
    } else {
        Ok(())
    }
}

/// `None` means the caller gave no filter at all, which is refused; an explicit
/// `Unfiltered` or an empty condition list means a deliberate full-table statement.
fn require_where(where_: Option<WhereClause>) -> Result<WhereClause, SqlExecError> {
    where_
        .map(WhereClause::normalized)
        .ok_or(SqlExecError::NoWhereClause)
}
