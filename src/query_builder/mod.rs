//! SQL generation collaborator used by [`QueryExec`](crate::QueryExec).

use crate::error::SqlExecError;
use crate::types::{Record, RowValues, Tables, WhereClause};

mod dml;
mod render;
mod select;

/// Generates SQL for each executor operation.
///
/// Implementations may keep staged state (selected columns, a default table, pending
/// conditions) that operations consume. The executor calls
/// [`reset_query`](Self::reset_query) after every successful SQL-generating call so that
/// staged state never leaks into the next operation.
pub trait QueryBuilder: Send {
    /// `SELECT COUNT(*) AS numrows ...`. `None` uses the staged table.
    ///
    /// # Errors
    /// Returns `SqlExecError::BuilderError` if no table is available.
    fn count(&mut self, table: Option<&str>) -> Result<String, SqlExecError>;

    /// `SELECT ...`. `None` uses the staged table.
    ///
    /// # Errors
    /// Returns `SqlExecError::BuilderError` if no table is available.
    fn get(&mut self, table: Option<&str>) -> Result<String, SqlExecError>;

    /// # Errors
    /// Returns `SqlExecError::BuilderError` for unusable identifiers or values.
    fn get_where(&mut self, tables: &Tables, conditions: &WhereClause)
    -> Result<String, SqlExecError>;

    /// # Errors
    /// Returns `SqlExecError::BuilderError` for an empty payload.
    fn insert(
        &mut self,
        table: &str,
        set: &[(String, RowValues)],
        ignore: bool,
        suffix: Option<&str>,
    ) -> Result<String, SqlExecError>;

    /// `INSERT IGNORE`, optionally followed by an on-duplicate clause.
    ///
    /// # Errors
    /// Same as [`insert`](Self::insert).
    fn insert_ignore(
        &mut self,
        table: &str,
        set: &[(String, RowValues)],
        on_dupe: Option<&str>,
    ) -> Result<String, SqlExecError> {
        self.insert(table, set, true, on_dupe)
    }

    /// # Errors
    /// Returns `SqlExecError::BuilderError` for no rows or rows missing a column.
    fn insert_batch(&mut self, table: &str, rows: &[Record]) -> Result<String, SqlExecError>;

    /// # Errors
    /// Returns `SqlExecError::BuilderError` for an empty payload.
    fn update(
        &mut self,
        table: &str,
        set: &[(String, RowValues)],
        where_: &WhereClause,
    ) -> Result<String, SqlExecError>;

    /// One UPDATE per chunk of rows, keyed on `index`.
    ///
    /// # Errors
    /// Returns `SqlExecError::BuilderError` for no rows or rows lacking the index column.
    fn update_batch(
        &mut self,
        table: &str,
        rows: &[Record],
        index: &str,
        where_: &WhereClause,
    ) -> Result<Vec<String>, SqlExecError>;

    /// `DELETE FROM ...`. `None` table uses the staged table; `None` filter uses only
    /// staged conditions.
    ///
    /// # Errors
    /// Returns `SqlExecError::BuilderError` if no single table is available.
    fn delete(
        &mut self,
        table: Option<&str>,
        where_: Option<&WhereClause>,
    ) -> Result<String, SqlExecError>;

    /// # Errors
    /// Returns `SqlExecError::BuilderError` for an unusable table name.
    fn empty_table(&mut self, table: &str) -> Result<String, SqlExecError>;

    /// # Errors
    /// Returns `SqlExecError::BuilderError` for an unusable table name.
    fn truncate(&mut self, table: &str) -> Result<String, SqlExecError>;

    /// Clear staged state after `sql` was generated.
    fn reset_query(&mut self, sql: &str);
}

/// Rows per statement generated by [`QueryBuilder::update_batch`] unless configured.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// A small MySQL-flavoured [`QueryBuilder`].
///
/// Identifiers are backtick-quoted, values are inlined as literals. State staged through
/// [`select`](Self::select), [`from`](Self::from), [`where_clause`](Self::where_clause),
/// [`order_by`](Self::order_by) and [`limit`](Self::limit) applies to the next generated
/// statement and is cleared by `reset_query`.
#[derive(Debug, Clone)]
pub struct BasicQueryBuilder {
    select: Vec<String>,
    from: Vec<String>,
    wheres: Vec<WhereClause>,
    order_by: Vec<(String, bool)>,
    limit: Option<(u64, Option<u64>)>,
    batch_size: usize,
    backslash_escapes: bool,
    last_query: Option<String>,
}

impl Default for BasicQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicQueryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            select: Vec::new(),
            from: Vec::new(),
            wheres: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            batch_size: DEFAULT_BATCH_SIZE,
            backslash_escapes: true,
            last_query: None,
        }
    }

    /// Builder for engines that treat backslashes in string literals literally
    /// (SQLite, standard SQL).
    #[must_use]
    pub fn ansi_strings() -> Self {
        Self {
            backslash_escapes: false,
            ..Self::new()
        }
    }

    /// Rows per `update_batch` statement. Zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        self.select
            .extend(columns.iter().map(|c| (*c).to_string()));
        self
    }

    pub fn from(&mut self, tables: impl Into<Tables>) -> &mut Self {
        self.from
            .extend(tables.into().names().map(str::to_string));
        self
    }

    pub fn where_clause(&mut self, clause: impl Into<WhereClause>) -> &mut Self {
        self.wheres.push(clause.into());
        self
    }

    pub fn order_by(&mut self, column: &str, descending: bool) -> &mut Self {
        self.order_by.push((column.to_string(), descending));
        self
    }

    pub fn limit(&mut self, limit: u64, offset: Option<u64>) -> &mut Self {
        self.limit = Some((limit, offset));
        self
    }

    /// The SQL passed to the most recent `reset_query`.
    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    fn staged_where(&self, extra: Option<&WhereClause>) -> Result<String, SqlExecError> {
        let mut fragments = Vec::new();
        for clause in self.wheres.iter().chain(extra) {
            render::where_fragments(clause, self.backslash_escapes, &mut fragments)?;
        }
        Ok(render::where_sql(&fragments))
    }

    fn staged_order_and_limit(&self) -> Result<String, SqlExecError> {
        let mut sql = String::new();
        if !self.order_by.is_empty() {
            let parts = self
                .order_by
                .iter()
                .map(|(col, desc)| {
                    render::identifier(col)
                        .map(|col| format!("{col} {}", if *desc { "DESC" } else { "ASC" }))
                })
                .collect::<Result<Vec<_>, _>>()?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&parts.join(", "));
        }
        sql.push_str(&self.limit_sql());
        Ok(sql)
    }

    fn limit_sql(&self) -> String {
        match self.limit {
            Some((limit, Some(offset))) => format!(" LIMIT {limit} OFFSET {offset}"),
            Some((limit, None)) => format!(" LIMIT {limit}"),
            None => String::new(),
        }
    }

    fn value(&self, value: &RowValues) -> Result<String, SqlExecError> {
        render::value(value, self.backslash_escapes)
    }
}

impl QueryBuilder for BasicQueryBuilder {
    fn count(&mut self, table: Option<&str>) -> Result<String, SqlExecError> {
        self.build_count(table)
    }

    fn get(&mut self, table: Option<&str>) -> Result<String, SqlExecError> {
        self.build_get(table)
    }

    fn get_where(
        &mut self,
        tables: &Tables,
        conditions: &WhereClause,
    ) -> Result<String, SqlExecError> {
        self.build_get_where(tables, conditions)
    }

    fn insert(
        &mut self,
        table: &str,
        set: &[(String, RowValues)],
        ignore: bool,
        suffix: Option<&str>,
    ) -> Result<String, SqlExecError> {
        self.build_insert(table, set, ignore, suffix)
    }

    fn insert_batch(&mut self, table: &str, rows: &[Record]) -> Result<String, SqlExecError> {
        self.build_insert_batch(table, rows)
    }

    fn update(
        &mut self,
        table: &str,
        set: &[(String, RowValues)],
        where_: &WhereClause,
    ) -> Result<String, SqlExecError> {
        self.build_update(table, set, where_)
    }

    fn update_batch(
        &mut self,
        table: &str,
        rows: &[Record],
        index: &str,
        where_: &WhereClause,
    ) -> Result<Vec<String>, SqlExecError> {
        self.build_update_batch(table, rows, index, where_)
    }

    fn delete(
        &mut self,
        table: Option<&str>,
        where_: Option<&WhereClause>,
    ) -> Result<String, SqlExecError> {
        self.build_delete(table, where_)
    }

    fn empty_table(&mut self, table: &str) -> Result<String, SqlExecError> {
        Ok(format!("DELETE FROM {}", render::identifier(table)?))
    }

    fn truncate(&mut self, table: &str) -> Result<String, SqlExecError> {
        Ok(format!("TRUNCATE {}", render::identifier(table)?))
    }

    fn reset_query(&mut self, sql: &str) {
        self.select.clear();
        self.from.clear();
        self.wheres.clear();
        self.order_by.clear();
        self.limit = None;
        self.last_query = Some(sql.to_string());
    }
}
