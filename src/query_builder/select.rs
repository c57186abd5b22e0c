use super::{BasicQueryBuilder, render};
use crate::error::SqlExecError;
use crate::types::{Tables, WhereClause};

impl BasicQueryBuilder {
    fn from_sql(&self, table: Option<&str>) -> Result<String, SqlExecError> {
        match table {
            Some(table) => render::identifier(table),
            None if self.from.is_empty() => Err(SqlExecError::BuilderError(
                "no table given and none staged with from()".into(),
            )),
            None => render::identifier_list(self.from.iter().map(String::as_str)),
        }
    }

    fn select_sql(&self) -> Result<String, SqlExecError> {
        if self.select.is_empty() {
            Ok("*".to_string())
        } else {
            render::identifier_list(self.select.iter().map(String::as_str))
        }
    }

    pub(super) fn build_count(&self, table: Option<&str>) -> Result<String, SqlExecError> {
        Ok(format!(
            "SELECT COUNT(*) AS `numrows` FROM {}{}",
            self.from_sql(table)?,
            self.staged_where(None)?
        ))
    }

    pub(super) fn build_get(&self, table: Option<&str>) -> Result<String, SqlExecError> {
        Ok(format!(
            "SELECT {} FROM {}{}{}",
            self.select_sql()?,
            self.from_sql(table)?,
            self.staged_where(None)?,
            self.staged_order_and_limit()?
        ))
    }

    pub(super) fn build_get_where(
        &self,
        tables: &Tables,
        conditions: &WhereClause,
    ) -> Result<String, SqlExecError> {
        Ok(format!(
            "SELECT {} FROM {}{}{}",
            self.select_sql()?,
            render::identifier_list(tables.names())?,
            self.staged_where(Some(conditions))?,
            self.staged_order_and_limit()?
        ))
    }
}
