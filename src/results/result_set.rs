use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::row::{CustomDbRow, index_columns};
use crate::types::RowValues;

/// A driver response before normalization.
///
/// Drivers report rows for queries and a set of summary fields for statements
/// (for example `insertId`/`affectedRows`/`changedRows` from MySQL-style clients or
/// `lastInsertRowid`/`changes` from SQLite). Field names are whatever the driver uses;
/// [`normalize`](super::normalize) maps them onto stable names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResult {
    /// Rows returned by the statement
    pub rows: Vec<CustomDbRow>,
    /// Driver-specific summary fields, keyed by the driver's own field names
    pub fields: BTreeMap<String, RowValues>,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl RawResult {
    /// Result carrying only summary fields.
    pub fn summary<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RowValues)>,
    {
        Self {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Self::default()
        }
    }

    /// Result whose rows will share the given column names.
    #[must_use]
    pub fn with_columns(column_names: Vec<String>) -> Self {
        let column_index = Arc::new(index_columns(&column_names));
        Self {
            column_names: Some(Arc::new(column_names)),
            column_index: Some(column_index),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row of values in column order.
    ///
    /// Values are ignored when no column names were set, matching a statement that
    /// returns no result columns.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(names), Some(index)) = (&self.column_names, &self.column_index) {
            self.rows.push(CustomDbRow::with_index(
                Arc::clone(names),
                Arc::clone(index),
                row_values,
            ));
        }
    }

    /// Set or replace one driver summary field.
    pub fn set_field(&mut self, name: impl Into<String>, value: RowValues) {
        self.fields.insert(name.into(), value);
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&RowValues> {
        self.fields.get(name)
    }

    /// No rows and no summary fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.fields.is_empty()
    }
}
