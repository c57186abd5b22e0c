use std::sync::Arc;

use super::QueryExec;
use crate::error::SqlExecError;
use crate::executor::PendingOperation;
use crate::query_builder::QueryBuilder;
use crate::results::NormalizedResult;
use crate::types::{Tables, WhereClause};

impl<B: QueryBuilder + 'static> QueryExec<B> {
    /// Run SQL exactly as given.
    ///
    /// # Errors
    /// Never fails before execution; the `Result` keeps the signature uniform.
    pub fn query(
        &self,
        sql: impl Into<String>,
    ) -> Result<PendingOperation<NormalizedResult>, SqlExecError> {
        Ok(self.pending(sql.into()))
    }

    /// Count rows of `table`, or of the staged table when `None`.
    ///
    /// Reports the `numrows` column of the first row rather than the raw result.
    ///
    /// # Errors
    /// Returns `SqlExecError::BuilderError` if no table is available.
    pub fn count(&self, table: Option<&str>) -> Result<PendingOperation<u64>, SqlExecError> {
        let sql = self.build(|qb| qb.count(table))?;
        Ok(PendingOperation::with_post_process(
            sql,
            Arc::clone(&self.executor),
            numrows,
        ))
    }

    /// Select from `table`, or from the staged table when `None`.
    ///
    /// # Errors
    /// Returns `SqlExecError::BuilderError` if no table is available.
    pub fn get(
        &self,
        table: Option<&str>,
    ) -> Result<PendingOperation<NormalizedResult>, SqlExecError> {
        let sql = self.build(|qb| qb.get(table))?;
        Ok(self.pending(sql))
    }

    /// Select from one or more tables filtered by column/value conditions.
    ///
    /// # Errors
    /// Returns `SqlExecError::GetWhereTable` for a blank table name or an empty list,
    /// and `SqlExecError::GetWhereConditions` unless `where_` is a
    /// [`WhereClause::Conditions`] record. Nothing is built in either case.
    pub fn get_where(
        &self,
        tables: impl Into<Tables>,
        where_: impl Into<WhereClause>,
    ) -> Result<PendingOperation<NormalizedResult>, SqlExecError> {
        let tables = tables.into();
        if !tables.is_valid() {
            return Err(SqlExecError::GetWhereTable);
        }
        let where_ = where_.into();
        if !matches!(where_, WhereClause::Conditions(_)) {
            return Err(SqlExecError::GetWhereConditions);
        }
        let sql = self.build(|qb| qb.get_where(&tables, &where_))?;
        Ok(self.pending(sql))
    }
}

fn numrows(result: NormalizedResult) -> Result<u64, SqlExecError> {
    let row = result
        .rows()
        .first()
        .ok_or_else(|| SqlExecError::ResultError("count returned no rows".into()))?;
    let value = row
        .get("numrows")
        .ok_or_else(|| SqlExecError::ResultError("count result has no numrows column".into()))?;
    value
        .as_integer_lenient()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| SqlExecError::ResultError(format!("numrows is not a row count: {value:?}")))
}
