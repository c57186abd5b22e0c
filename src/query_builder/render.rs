use std::fmt::Write as _;

use crate::error::SqlExecError;
use crate::types::{RowValues, WhereClause};

const OPERATORS: &[&str] = &[
    "=", "!=", "<>", "<", ">", "<=", ">=", "LIKE", "NOT LIKE", "IS", "IS NOT",
];

/// Backtick-quote an identifier, one dot-separated part at a time.
pub(super) fn identifier(name: &str) -> Result<String, SqlExecError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SqlExecError::BuilderError("empty identifier".into()));
    }
    if name == "*" {
        return Ok(name.to_string());
    }
    let mut out = String::with_capacity(name.len() + 2);
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        let part = part.trim();
        if part.is_empty() {
            return Err(SqlExecError::BuilderError(format!(
                "malformed identifier: {name}"
            )));
        }
        if part == "*" {
            out.push('*');
        } else {
            out.push('`');
            out.push_str(&part.replace('`', "``"));
            out.push('`');
        }
    }
    Ok(out)
}

pub(super) fn identifier_list<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<String, SqlExecError> {
    let quoted = names
        .into_iter()
        .map(identifier)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quoted.join(", "))
}

/// String literal. With `backslash_escapes` (MySQL default mode) backslashes are escaped
/// too; otherwise only quotes are doubled.
pub(super) fn string_literal(text: &str, backslash_escapes: bool) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' if backslash_escapes => out.push_str("\\\\"),
            '\0' if backslash_escapes => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

pub(super) fn value(value: &RowValues, backslash_escapes: bool) -> Result<String, SqlExecError> {
    let rendered = match value {
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) if f.is_finite() => f.to_string(),
        RowValues::Float(f) => {
            return Err(SqlExecError::BuilderError(format!(
                "non-finite float cannot be written as SQL: {f}"
            )));
        }
        RowValues::Text(s) => string_literal(s, backslash_escapes),
        RowValues::Bool(b) => String::from(if *b { "1" } else { "0" }),
        RowValues::Timestamp(ts) => string_literal(
            &ts.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            backslash_escapes,
        ),
        RowValues::Null => "NULL".to_string(),
        RowValues::JSON(json) => string_literal(&json.to_string(), backslash_escapes),
        RowValues::Blob(bytes) => {
            let mut hex = String::with_capacity(bytes.len() * 2 + 3);
            hex.push_str("X'");
            for b in bytes {
                let _ = write!(hex, "{b:02X}");
            }
            hex.push('\'');
            hex
        }
    };
    Ok(rendered)
}

/// Split `"age >="` into (`age`, `Some(">=")`).
fn split_condition_key(key: &str) -> Result<(&str, Option<String>), SqlExecError> {
    let key = key.trim();
    let Some(pos) = key.find(char::is_whitespace) else {
        return Ok((key, None));
    };
    let (column, op) = key.split_at(pos);
    let op = op.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    if OPERATORS.contains(&op.as_str()) {
        Ok((column, Some(op)))
    } else {
        Err(SqlExecError::BuilderError(format!(
            "unsupported operator in condition: {key}"
        )))
    }
}

fn condition(key: &str, val: &RowValues, backslash_escapes: bool) -> Result<String, SqlExecError> {
    let (column, op) = split_condition_key(key)?;
    let column = identifier(column)?;
    let rendered = match (op.as_deref(), val) {
        (None | Some("=" | "IS"), RowValues::Null) => format!("{column} IS NULL"),
        (Some("!=" | "<>" | "IS NOT"), RowValues::Null) => format!("{column} IS NOT NULL"),
        (None, other) => format!("{column} = {}", value(other, backslash_escapes)?),
        (Some(op), other) => format!("{column} {op} {}", value(other, backslash_escapes)?),
    };
    Ok(rendered)
}

/// Render one WHERE clause into AND-able fragments. `Unfiltered` yields none.
pub(super) fn where_fragments(
    clause: &WhereClause,
    backslash_escapes: bool,
    out: &mut Vec<String>,
) -> Result<(), SqlExecError> {
    match clause {
        WhereClause::Unfiltered => {}
        WhereClause::Raw(sql) => {
            if sql.trim().is_empty() {
                return Err(SqlExecError::BuilderError("empty where clause".into()));
            }
            out.push(format!("({})", sql.trim()));
        }
        WhereClause::Conditions(conds) => {
            for (key, val) in conds {
                out.push(condition(key, val, backslash_escapes)?);
            }
        }
    }
    Ok(())
}

pub(super) fn where_sql(fragments: &[String]) -> String {
    if fragments.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", fragments.join(" AND "))
    }
}
