use serde::Deserialize;

use super::result_set::RawResult;
use crate::types::RowValues;

/// Driver field names recognised for each canonical result field.
///
/// The first alias present on a raw result wins. Defaults cover MySQL-style clients
/// (`insertId`, `affectedRows`, `changedRows`) and the bundled SQLite driver
/// (`lastInsertRowid`, `changes`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResultFields {
    pub insert_id: Vec<String>,
    pub affected_rows: Vec<String>,
    pub changed_rows: Vec<String>,
}

impl Default for ResultFields {
    fn default() -> Self {
        Self {
            insert_id: vec!["insertId".into(), "lastInsertRowid".into()],
            affected_rows: vec!["affectedRows".into(), "changes".into()],
            changed_rows: vec!["changedRows".into()],
        }
    }
}

/// A driver result with stable names for the insert id and row counts.
///
/// The raw result is kept as the driver produced it, including its own field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResult {
    pub insert_id: Option<i64>,
    pub affected_rows: Option<u64>,
    pub changed_rows: Option<u64>,
    pub raw: RawResult,
}

impl NormalizedResult {
    #[must_use]
    pub fn rows(&self) -> &[crate::results::CustomDbRow] {
        &self.raw.rows
    }

    #[must_use]
    pub fn into_raw(self) -> RawResult {
        self.raw
    }

    /// Add another statement's row counts onto this one.
    ///
    /// A count missing on one side contributes nothing; it stays `None` only when
    /// neither side reported it.
    pub fn add_counts(&mut self, other: &NormalizedResult) {
        self.affected_rows = sum_counts(self.affected_rows, other.affected_rows);
        self.changed_rows = sum_counts(self.changed_rows, other.changed_rows);
    }
}

fn sum_counts(current: Option<u64>, extra: Option<u64>) -> Option<u64> {
    match (current, extra) {
        (Some(a), Some(b)) => Some(a.saturating_add(b)),
        (a, b) => a.or(b),
    }
}

/// Normalize with the default field aliases.
#[must_use]
pub fn normalize(raw: RawResult) -> NormalizedResult {
    normalize_with(raw, &ResultFields::default())
}

/// Copy the first present alias of each canonical field onto the normalized result.
///
/// Empty results pass through with every canonical field absent.
#[must_use]
pub fn normalize_with(raw: RawResult, fields: &ResultFields) -> NormalizedResult {
    if raw.is_empty() {
        return NormalizedResult {
            raw,
            ..NormalizedResult::default()
        };
    }

    let insert_id = lookup(&raw, &fields.insert_id).and_then(|(name, value)| {
        let id = value.as_integer_lenient();
        if id.is_none() {
            tracing::warn!(field = name, ?value, "ignoring non-integer insert id");
        }
        id
    });
    let affected_rows = lookup(&raw, &fields.affected_rows).and_then(|(name, v)| count(name, v));
    let changed_rows = lookup(&raw, &fields.changed_rows).and_then(|(name, v)| count(name, v));

    NormalizedResult {
        insert_id,
        affected_rows,
        changed_rows,
        raw,
    }
}

fn lookup<'a>(raw: &'a RawResult, aliases: &'a [String]) -> Option<(&'a str, &'a RowValues)> {
    aliases
        .iter()
        .find_map(|alias| raw.field(alias).map(|value| (alias.as_str(), value)))
}

fn count(name: &str, value: &RowValues) -> Option<u64> {
    let parsed = value
        .as_integer_lenient()
        .and_then(|n| u64::try_from(n).ok());
    if parsed.is_none() {
        tracing::warn!(field = name, ?value, "ignoring unusable row count");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_mysql_style_fields() {
        let raw = RawResult::summary([
            ("insertId", RowValues::Int(17)),
            ("affectedRows", RowValues::Int(1)),
            ("changedRows", RowValues::Int(0)),
            ("serverStatus", RowValues::Int(2)),
        ]);
        let res = normalize(raw);
        assert_eq!(res.insert_id, Some(17));
        assert_eq!(res.affected_rows, Some(1));
        assert_eq!(res.changed_rows, Some(0));
        // originals stay in place
        assert_eq!(res.raw.field("insertId"), Some(&RowValues::Int(17)));
        assert_eq!(res.raw.field("serverStatus"), Some(&RowValues::Int(2)));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let res = normalize(RawResult::summary([("changes", RowValues::Int(3))]));
        assert_eq!(res.affected_rows, Some(3));
        assert_eq!(res.insert_id, None);
        assert_eq!(res.changed_rows, None);
    }

    #[test]
    fn empty_result_is_unchanged() {
        let res = normalize(RawResult::default());
        assert_eq!(res, NormalizedResult::default());
    }

    #[test]
    fn first_alias_wins_and_custom_aliases_apply() {
        let raw = RawResult::summary([
            ("affectedRows", RowValues::Int(5)),
            ("changes", RowValues::Int(9)),
            ("rowCount", RowValues::Text("4".into())),
        ]);
        assert_eq!(normalize(raw.clone()).affected_rows, Some(5));

        let fields = ResultFields {
            affected_rows: vec!["rowCount".into()],
            ..ResultFields::default()
        };
        assert_eq!(normalize_with(raw, &fields).affected_rows, Some(4));
    }

    #[test]
    fn unusable_counts_are_dropped() {
        let raw = RawResult::summary([
            ("affectedRows", RowValues::Int(-1)),
            ("changedRows", RowValues::Text("many".into())),
        ]);
        let res = normalize(raw);
        assert_eq!(res.affected_rows, None);
        assert_eq!(res.changed_rows, None);
    }

    #[test]
    fn add_counts_sums_and_fills() {
        let mut acc = NormalizedResult {
            affected_rows: Some(2),
            ..NormalizedResult::default()
        };
        let next = NormalizedResult {
            affected_rows: Some(3),
            changed_rows: Some(1),
            ..NormalizedResult::default()
        };
        acc.add_counts(&next);
        assert_eq!(acc.affected_rows, Some(5));
        assert_eq!(acc.changed_rows, Some(1));
    }

    #[test]
    fn field_aliases_deserialize_with_defaults() {
        let fields: ResultFields =
            serde_json::from_str(r#"{"affected_rows": ["rowCount"]}"#).unwrap();
        assert_eq!(fields.affected_rows, vec!["rowCount".to_string()]);
        assert_eq!(fields.insert_id, ResultFields::default().insert_id);
    }
}
