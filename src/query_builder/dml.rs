use super::{BasicQueryBuilder, render};
use crate::error::SqlExecError;
use crate::types::{Record, RowValues, WhereClause};

impl BasicQueryBuilder {
    fn assignments(&self, set: &[(String, RowValues)]) -> Result<String, SqlExecError> {
        if set.is_empty() {
            return Err(SqlExecError::BuilderError("no values to write".into()));
        }
        let parts = set
            .iter()
            .map(|(col, val)| -> Result<String, SqlExecError> {
                Ok(format!("{} = {}", render::identifier(col)?, self.value(val)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(", "))
    }

    fn values_tuple(&self, columns: &[&str], row: &Record) -> Result<String, SqlExecError> {
        let values = columns
            .iter()
            .map(|col| {
                let (_, val) = row.iter().find(|(name, _)| name == col).ok_or_else(|| {
                    SqlExecError::BuilderError(format!("row is missing column {col}"))
                })?;
                self.value(val)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("({})", values.join(", ")))
    }

    pub(super) fn build_insert(
        &self,
        table: &str,
        set: &[(String, RowValues)],
        ignore: bool,
        suffix: Option<&str>,
    ) -> Result<String, SqlExecError> {
        if set.is_empty() {
            return Err(SqlExecError::BuilderError("no values to insert".into()));
        }
        let columns = render::identifier_list(set.iter().map(|(col, _)| col.as_str()))?;
        let values = set
            .iter()
            .map(|(_, val)| self.value(val))
            .collect::<Result<Vec<_>, _>>()?;
        let mut sql = format!(
            "INSERT {}INTO {} ({columns}) VALUES ({})",
            if ignore { "IGNORE " } else { "" },
            render::identifier(table)?,
            values.join(", ")
        );
        if let Some(suffix) = suffix.map(str::trim).filter(|s| !s.is_empty()) {
            sql.push(' ');
            sql.push_str(suffix);
        }
        Ok(sql)
    }

    pub(super) fn build_insert_batch(
        &self,
        table: &str,
        rows: &[Record],
    ) -> Result<String, SqlExecError> {
        let first = rows
            .first()
            .ok_or_else(|| SqlExecError::BuilderError("no rows to insert".into()))?;
        let columns: Vec<&str> = first.iter().map(|(col, _)| col.as_str()).collect();
        if columns.is_empty() {
            return Err(SqlExecError::BuilderError("no values to insert".into()));
        }
        let tuples = rows
            .iter()
            .map(|row| self.values_tuple(&columns, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!(
            "INSERT INTO {} ({}) VALUES {}",
            render::identifier(table)?,
            render::identifier_list(columns.iter().copied())?,
            tuples.join(", ")
        ))
    }

    pub(super) fn build_update(
        &self,
        table: &str,
        set: &[(String, RowValues)],
        where_: &WhereClause,
    ) -> Result<String, SqlExecError> {
        Ok(format!(
            "UPDATE {} SET {}{}{}",
            render::identifier(table)?,
            self.assignments(set)?,
            self.staged_where(Some(where_))?,
            self.limit_sql()
        ))
    }

    pub(super) fn build_update_batch(
        &self,
        table: &str,
        rows: &[Record],
        index: &str,
        where_: &WhereClause,
    ) -> Result<Vec<String>, SqlExecError> {
        if rows.is_empty() {
            return Err(SqlExecError::BuilderError("no rows to update".into()));
        }
        let table = render::identifier(table)?;
        let index_col = render::identifier(index)?;
        let base_where = {
            let mut fragments = Vec::new();
            for clause in self.wheres.iter().chain(Some(where_)) {
                render::where_fragments(clause, self.backslash_escapes, &mut fragments)?;
            }
            fragments
        };

        rows.chunks(self.batch_size)
            .map(|chunk| self.update_chunk(&table, index, &index_col, &base_where, chunk))
            .collect()
    }

    fn update_chunk(
        &self,
        table: &str,
        index: &str,
        index_col: &str,
        base_where: &[String],
        chunk: &[Record],
    ) -> Result<String, SqlExecError> {
        let mut keys = Vec::with_capacity(chunk.len());
        for row in chunk {
            let (_, key) = row.iter().find(|(col, _)| col == index).ok_or_else(|| {
                SqlExecError::BuilderError(format!("row is missing index column {index}"))
            })?;
            keys.push(self.value(key)?);
        }

        // columns in first-seen order, index excluded
        let mut columns: Vec<&str> = Vec::new();
        for (col, _) in chunk.iter().flatten() {
            if col != index && !columns.contains(&col.as_str()) {
                columns.push(col);
            }
        }
        if columns.is_empty() {
            return Err(SqlExecError::BuilderError(
                "rows carry no columns besides the index".into(),
            ));
        }

        let mut cases = Vec::with_capacity(columns.len());
        for col in columns {
            let quoted = render::identifier(col)?;
            let mut case = format!("{quoted} = CASE");
            for (row, key) in chunk.iter().zip(&keys) {
                if let Some((_, val)) = row.iter().find(|(name, _)| name == col) {
                    case.push_str(&format!(
                        " WHEN {index_col} = {key} THEN {}",
                        self.value(val)?
                    ));
                }
            }
            case.push_str(&format!(" ELSE {quoted} END"));
            cases.push(case);
        }

        let mut fragments = base_where.to_vec();
        fragments.push(format!("{index_col} IN ({})", keys.join(", ")));
        Ok(format!(
            "UPDATE {table} SET {}{}",
            cases.join(", "),
            render::where_sql(&fragments)
        ))
    }

    pub(super) fn build_delete(
        &self,
        table: Option<&str>,
        where_: Option<&WhereClause>,
    ) -> Result<String, SqlExecError> {
        let table = match (table, self.from.as_slice()) {
            (Some(table), _) => table,
            (None, [staged]) => staged.as_str(),
            (None, []) => {
                return Err(SqlExecError::BuilderError(
                    "no table given and none staged with from()".into(),
                ));
            }
            (None, _) => {
                return Err(SqlExecError::BuilderError(
                    "delete() accepts a single table".into(),
                ));
            }
        };
        Ok(format!(
            "DELETE FROM {}{}{}",
            render::identifier(table)?,
            self.staged_where(where_)?,
            self.limit_sql()
        ))
    }
}
