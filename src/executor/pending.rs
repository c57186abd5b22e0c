use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use super::dispatch::Executor;
use crate::error::SqlExecError;
use crate::results::NormalizedResult;

/// Turns a normalized result into the value an operation reports.
pub type PostProcess<T> = fn(NormalizedResult) -> Result<T, SqlExecError>;

/// A built statement waiting to be run in one of two ways.
///
/// Every operation of [`QueryExec`](crate::QueryExec) returns one of these after validating
/// its arguments and generating SQL. Consuming it with [`with_callback`](Self::with_callback)
/// reports the outcome to a completion handler; [`deferred`](Self::deferred) returns a
/// future instead. Both paths apply the operation's post-processing, so an operation like
/// `count` reports the same value either way.
///
/// ```rust,no_run
/// use sql_query_exec::prelude::*;
///
/// # async fn demo(exec: &QueryExec<BasicQueryBuilder>) -> Result<(), SqlExecError> {
/// // deferred
/// let users = exec.get(Some("users"))?.deferred()?.await?;
/// # let _ = users;
///
/// // callback
/// exec.count(Some("users"))?.with_callback(|outcome| match outcome {
///     Ok(n) => println!("{n} users"),
///     Err(err) => eprintln!("count failed: {err}"),
/// })?;
/// # Ok(()) }
/// ```
#[must_use = "a pending operation does nothing until it is invoked"]
pub struct PendingOperation<T> {
    sql: String,
    executor: Arc<Executor>,
    post: PostProcess<T>,
}

impl<T> std::fmt::Debug for PendingOperation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingOperation")
            .field("sql", &self.sql)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl PendingOperation<NormalizedResult> {
    pub(crate) fn new(sql: String, executor: Arc<Executor>) -> Self {
        Self {
            sql,
            executor,
            post: Ok,
        }
    }
}

impl<T: Send + 'static> PendingOperation<T> {
    pub(crate) fn with_post_process(
        sql: String,
        executor: Arc<Executor>,
        post: PostProcess<T>,
    ) -> Self {
        Self {
            sql,
            executor,
            post,
        }
    }

    /// The SQL this operation will submit.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Submit the statement and report the outcome to `callback`.
    ///
    /// Returns as soon as the statement is submitted. `callback` runs exactly once, on a
    /// runtime task, with either the result or the execution error.
    ///
    /// # Errors
    /// Returns a configuration error (no connection, no Tokio runtime) without calling
    /// `callback`.
    pub fn with_callback<F>(self, callback: F) -> Result<(), SqlExecError>
    where
        F: FnOnce(Result<T, SqlExecError>) + Send + 'static,
    {
        let post = self.post;
        self.executor
            .exec(self.sql, move |outcome| callback(outcome.and_then(post)))
    }

    /// Submit the statement and return a future for its outcome.
    ///
    /// The statement runs whether or not the returned [`Deferred`] is polled or kept.
    ///
    /// # Errors
    /// Returns a configuration error (no connection, no Tokio runtime).
    pub fn deferred(self) -> Result<Deferred<T>, SqlExecError> {
        let (tx, rx) = oneshot::channel();
        let post = self.post;
        self.executor.exec(self.sql, move |outcome| {
            // a dropped receiver only means nobody is waiting for the outcome
            let _ = tx.send(outcome.and_then(post));
        })?;
        Ok(Deferred { rx })
    }

    /// Submit and await in one step.
    ///
    /// # Errors
    /// Returns configuration errors and execution errors alike.
    pub async fn run(self) -> Result<T, SqlExecError> {
        self.deferred()?.await
    }
}

/// The eventual outcome of a submitted operation. Settles exactly once.
#[must_use = "a deferred value reports nothing unless awaited"]
#[derive(Debug)]
pub struct Deferred<T> {
    rx: oneshot::Receiver<Result<T, SqlExecError>>,
}

impl<T> Future for Deferred<T> {
    type Output = Result<T, SqlExecError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(SqlExecError::ExecutionError(
                    "operation ended without reporting an outcome".into(),
                ))
            })
        })
    }
}
