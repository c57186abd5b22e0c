use rusqlite::Statement;
use rusqlite::types::ValueRef;

use crate::error::SqlExecError;
use crate::results::RawResult;
use crate::types::RowValues;

/// Field names this driver reports for statements that return no columns.
pub(crate) const LAST_INSERT_ROWID: &str = "lastInsertRowid";
pub(crate) const CHANGES: &str = "changes";

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlExecError` if the column cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SqlExecError> {
    let value = match row.get_ref(idx)? {
        ValueRef::Null => RowValues::Null,
        ValueRef::Integer(i) => RowValues::Int(i),
        ValueRef::Real(f) => RowValues::Float(f),
        ValueRef::Text(bytes) => RowValues::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => RowValues::Blob(bytes.to_vec()),
    };
    Ok(value)
}

/// Collect every row produced by a statement that has result columns.
///
/// # Errors
/// Returns `SqlExecError` if the query or a value read fails.
pub fn build_raw_result(stmt: &mut Statement) -> Result<RawResult, SqlExecError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();
    let mut result = RawResult::with_columns(column_names);

    let mut rows = stmt.query(rusqlite::params![])?;
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        result.add_row_values(row_values);
    }
    Ok(result)
}

/// Run one statement: rows for queries, a change summary for everything else.
pub(crate) fn run_statement(
    conn: &mut rusqlite::Connection,
    sql: &str,
) -> Result<RawResult, SqlExecError> {
    let mut stmt = conn.prepare(sql)?;
    if stmt.column_count() > 0 {
        return build_raw_result(&mut stmt);
    }

    let changes = stmt.execute(rusqlite::params![])?;
    let mut result = RawResult::default();
    result.set_field(
        CHANGES,
        RowValues::Int(i64::try_from(changes).unwrap_or(i64::MAX)),
    );
    result.set_field(LAST_INSERT_ROWID, RowValues::Int(conn.last_insert_rowid()));
    Ok(result)
}
