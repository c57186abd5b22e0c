use serde::Deserialize;

use crate::results::ResultFields;

/// Executor settings a host may load from its own configuration.
///
/// ```rust
/// use sql_query_exec::prelude::*;
///
/// let opts: ExecOptions = serde_json::from_str(
///     r#"{ "result_fields": { "affected_rows": ["rowCount"] } }"#,
/// ).unwrap();
/// assert_eq!(opts.result_fields.affected_rows, vec!["rowCount".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecOptions {
    /// Driver field names mapped onto `insert_id`, `affected_rows` and `changed_rows`
    pub result_fields: ResultFields,
}

impl ExecOptions {
    #[must_use]
    pub fn with_result_fields(mut self, result_fields: ResultFields) -> Self {
        self.result_fields = result_fields;
        self
    }
}
