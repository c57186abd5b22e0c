use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values carried by result rows, driver summary fields, SET payloads and WHERE conditions.
///
/// ```rust
/// use sql_query_exec::prelude::*;
///
/// let set: Record = vec![
///     ("id".into(), RowValues::Int(1)),
///     ("name".into(), RowValues::Text("alice".into())),
///     ("active".into(), RowValues::Bool(true)),
/// ];
/// # let _ = set;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Integer view that also accepts integer text, as some drivers report
    /// counters and identifiers as strings.
    #[must_use]
    pub fn as_integer_lenient(&self) -> Option<i64> {
        match self {
            RowValues::Int(value) => Some(*value),
            RowValues::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Ordered column/value assignments used for INSERT and UPDATE payloads.
pub type Record = Vec<(String, RowValues)>;

/// One table name or a list of table names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tables {
    One(String),
    Many(Vec<String>),
}

impl Tables {
    /// Table names as a slice-like iterator, in the order given.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match self {
            Tables::One(name) => std::slice::from_ref(name),
            Tables::Many(names) => names,
        };
        names.iter().map(String::as_str)
    }

    /// At least one name, and no blank names.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let mut names = self.names().peekable();
        names.peek().is_some() && names.all(|name| !name.trim().is_empty())
    }
}

impl From<&str> for Tables {
    fn from(value: &str) -> Self {
        Tables::One(value.to_string())
    }
}

impl From<String> for Tables {
    fn from(value: String) -> Self {
        Tables::One(value)
    }
}

impl From<Vec<String>> for Tables {
    fn from(value: Vec<String>) -> Self {
        Tables::Many(value)
    }
}

impl From<Vec<&str>> for Tables {
    fn from(value: Vec<&str>) -> Self {
        Tables::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Tables {
    fn from(value: &[&str]) -> Self {
        Tables::Many(value.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Filter for SELECT/UPDATE/DELETE statements.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    /// Column/value pairs joined with AND. A key may carry a trailing operator,
    /// e.g. `"age >"`.
    Conditions(Vec<(String, RowValues)>),
    /// A literal SQL condition, passed to the builder as written.
    Raw(String),
    /// Explicitly no filter (intentional full-table statement).
    Unfiltered,
}

impl WhereClause {
    /// Single `column = value` condition.
    pub fn eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        WhereClause::Conditions(vec![(column.into(), value.into())])
    }

    /// Collapse empty condition lists to [`WhereClause::Unfiltered`].
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            WhereClause::Conditions(conds) if conds.is_empty() => WhereClause::Unfiltered,
            other => other,
        }
    }

    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        matches!(self, WhereClause::Unfiltered)
    }
}

impl From<Vec<(String, RowValues)>> for WhereClause {
    fn from(value: Vec<(String, RowValues)>) -> Self {
        WhereClause::Conditions(value)
    }
}

impl From<Vec<(&str, RowValues)>> for WhereClause {
    fn from(value: Vec<(&str, RowValues)>) -> Self {
        WhereClause::Conditions(value.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

impl From<&str> for WhereClause {
    fn from(value: &str) -> Self {
        WhereClause::Raw(value.to_string())
    }
}

impl From<String> for WhereClause {
    fn from(value: String) -> Self {
        WhereClause::Raw(value)
    }
}
