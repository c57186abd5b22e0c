use std::sync::Arc;

use super::dispatch::{Executor, current_runtime};
use crate::connection::Connection;
use crate::error::SqlExecError;
use crate::results::NormalizedResult;

/// Running state of a multi-statement batch.
#[derive(Debug, Default)]
pub(crate) struct BatchAccumulator {
    result: Option<NormalizedResult>,
    errors: Vec<SqlExecError>,
}

impl BatchAccumulator {
    pub(crate) fn record(&mut self, outcome: Result<NormalizedResult, SqlExecError>) {
        match outcome {
            Ok(res) => match self.result.as_mut() {
                Some(acc) => acc.add_counts(&res),
                None => self.result = Some(res),
            },
            Err(err) => self.errors.push(err),
        }
    }

    pub(crate) fn finish(self) -> (Vec<SqlExecError>, Option<NormalizedResult>) {
        (self.errors, self.result)
    }
}

impl Executor {
    /// Run `statements` one after another and report once at the end.
    ///
    /// A failing statement does not stop the batch. `callback` receives every error in
    /// statement order, plus the first successful result with the affected/changed row
    /// counts of all later successes added on (`None` if nothing succeeded).
    ///
    /// # Errors
    /// Returns a configuration error (no connection, no Tokio runtime) synchronously,
    /// without running anything or calling `callback`.
    pub fn run_batch<F>(
        self: &Arc<Self>,
        statements: Vec<String>,
        callback: F,
    ) -> Result<(), SqlExecError>
    where
        F: FnOnce(Vec<SqlExecError>, Option<NormalizedResult>) + Send + 'static,
    {
        let conn = self.connection()?;
        let runtime = current_runtime()?;
        let this = Arc::clone(self);
        runtime.spawn(async move {
            let (errors, result) = this.execute_sequentially(conn.as_ref(), statements).await;
            callback(errors, result);
        });
        Ok(())
    }

    async fn execute_sequentially(
        &self,
        conn: &dyn Connection,
        statements: Vec<String>,
    ) -> (Vec<SqlExecError>, Option<NormalizedResult>) {
        let total = statements.len();
        let mut acc = BatchAccumulator::default();

        for (idx, sql) in statements.into_iter().enumerate() {
            tracing::debug!(statement = idx + 1, total, "running batch statement");
            acc.record(self.submit(conn, &sql).await);
            if idx + 1 < total {
                tokio::task::yield_now().await;
            }
        }

        let (errors, result) = acc.finish();
        if errors.is_empty() {
            tracing::debug!(total, "batch completed");
        } else {
            tracing::info!(total, failed = errors.len(), "batch completed with errors");
        }
        (errors, result)
    }
}
