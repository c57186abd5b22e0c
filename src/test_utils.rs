//! Scripted connection for exercising the executor without a database.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::connection::Connection;
use crate::error::SqlExecError;
use crate::results::RawResult;
use crate::types::RowValues;

/// A [`Connection`] that replays queued responses and records every statement it sees.
///
/// Responses are consumed in submission order; once the queue is empty every statement
/// succeeds with an empty result.
#[derive(Debug, Default)]
pub struct ScriptedConnection {
    responses: Mutex<VecDeque<Result<RawResult, String>>>,
    executed: Mutex<Vec<String>>,
}

impl ScriptedConnection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle, ready to pass to [`QueryExec`](crate::QueryExec).
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn push_ok(&self, raw: RawResult) -> &Self {
        lock(&self.responses).push_back(Ok(raw));
        self
    }

    pub fn push_err(&self, message: impl Into<String>) -> &Self {
        lock(&self.responses).push_back(Err(message.into()));
        self
    }

    /// Every statement submitted so far, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        lock(&self.executed).clone()
    }

    #[must_use]
    pub fn pending_responses(&self) -> usize {
        lock(&self.responses).len()
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn query(&self, sql: &str) -> Result<RawResult, SqlExecError> {
        lock(&self.executed).push(sql.to_string());
        let next = lock(&self.responses).pop_front();
        // completion is never delivered on the submitting call stack
        tokio::task::yield_now().await;
        match next {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(message)) => Err(SqlExecError::ExecutionError(message)),
            None => Ok(RawResult::default()),
        }
    }

    fn driver_name(&self) -> &str {
        "scripted"
    }
}

/// MySQL-style statement summary.
#[must_use]
pub fn affected(affected_rows: i64, changed_rows: i64) -> RawResult {
    RawResult::summary([
        ("affectedRows", RowValues::Int(affected_rows)),
        ("changedRows", RowValues::Int(changed_rows)),
    ])
}

/// Single-row result shaped like a `SELECT COUNT(*) AS numrows` response.
#[must_use]
pub fn numrows(count: i64) -> RawResult {
    let mut raw = RawResult::with_columns(vec!["numrows".to_string()]);
    raw.add_row_values(vec![RowValues::Int(count)]);
    raw
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
