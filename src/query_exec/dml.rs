use super::{QueryExec, lock, require_table, require_where};
use crate::error::SqlExecError;
use crate::executor::PendingOperation;
use crate::query_builder::QueryBuilder;
use crate::results::NormalizedResult;
use crate::types::{Record, WhereClause};

type Pending = Result<PendingOperation<NormalizedResult>, SqlExecError>;

impl<B: QueryBuilder + 'static> QueryExec<B> {
    /// # Errors
    /// Returns `SqlExecError::NoTableName` for a blank table name, or the builder's error.
    pub fn insert(&self, table: &str, set: Record) -> Pending {
        require_table(table)?;
        let sql = self.build(|qb| qb.insert(table, &set, false, None))?;
        Ok(self.pending(sql))
    }

    /// `INSERT IGNORE`, with an optional on-duplicate clause appended.
    ///
    /// # Errors
    /// Returns `SqlExecError::NoTableName` for a blank table name, or the builder's error.
    pub fn insert_ignore(&self, table: &str, set: Record, on_dupe: Option<&str>) -> Pending {
        require_table(table)?;
        let sql = self.build(|qb| qb.insert_ignore(table, &set, on_dupe))?;
        Ok(self.pending(sql))
    }

    /// Insert several rows in one statement.
    ///
    /// # Errors
    /// Returns `SqlExecError::NoTableName` for a blank table name, or the builder's error.
    pub fn insert_batch(&self, table: &str, rows: Vec<Record>) -> Pending {
        require_table(table)?;
        let sql = self.build(|qb| qb.insert_batch(table, &rows))?;
        Ok(self.pending(sql))
    }

    /// Update rows of `table`.
    ///
    /// A filter must be given explicitly: `None` is refused so that a forgotten filter
    /// never turns into a full-table update. Pass [`WhereClause::Unfiltered`] (or an
    /// empty condition list) to update every row on purpose.
    ///
    /// # Errors
    /// Returns `SqlExecError::NoTableName`, `SqlExecError::NoWhereClause`, or the
    /// builder's error.
    pub fn update(&self, table: &str, set: Record, where_: Option<WhereClause>) -> Pending {
        require_table(table)?;
        let where_ = require_where(where_)?;
        let sql = self.build(|qb| qb.update(table, &set, &where_))?;
        Ok(self.pending(sql))
    }

    /// Update many rows keyed on `index`, split into several statements by the builder.
    ///
    /// Statements run one at a time in order. A failing statement does not stop the rest;
    /// `callback` gets every error plus the combined result of the statements that
    /// succeeded (`None` if none did). Only the callback form exists for this operation.
    /// Staged builder state is consumed and cleared before this returns.
    ///
    /// # Errors
    /// Returns `SqlExecError::NoTableName`, `SqlExecError::NoWhereClause`, the builder's
    /// error, or a configuration error, all before anything runs.
    pub fn update_batch<F>(
        &self,
        table: &str,
        rows: &[Record],
        index: &str,
        where_: Option<WhereClause>,
        callback: F,
    ) -> Result<(), SqlExecError>
    where
        F: FnOnce(Vec<SqlExecError>, Option<NormalizedResult>) + Send + 'static,
    {
        require_table(table)?;
        let where_ = require_where(where_)?;
        let statements = {
            let mut qb = lock(&self.builder);
            let statements = qb.update_batch(table, rows, index, &where_)?;
            for sql in &statements {
                qb.reset_query(sql);
            }
            statements
        };
        tracing::debug!(table, statements = statements.len(), "prepared batch update");

        self.executor.run_batch(statements, callback)
    }

    /// Delete from `table` (or the staged table) matching `where_` (or staged conditions).
    ///
    /// # Errors
    /// Returns the builder's error when no single table is available.
    pub fn delete(&self, table: Option<&str>, where_: Option<WhereClause>) -> Pending {
        let where_ = where_.map(WhereClause::normalized);
        let sql = self.build(|qb| qb.delete(table, where_.as_ref()))?;
        Ok(self.pending(sql))
    }

    /// Delete every row of `table`.
    ///
    /// # Errors
    /// Returns `SqlExecError::NoTableName` for a blank table name.
    pub fn empty_table(&self, table: &str) -> Pending {
        require_table(table)?;
        let sql = self.build(|qb| qb.empty_table(table))?;
        Ok(self.pending(sql))
    }

    /// # Errors
    /// Returns `SqlExecError::NoTableName` for a blank table name.
    pub fn truncate(&self, table: &str) -> Pending {
        require_table(table)?;
        let sql = self.build(|qb| qb.truncate(table))?;
        Ok(self.pending(sql))
    }
}
