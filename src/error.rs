use thiserror::Error;

/// Broad category of a [`SqlExecError`].
///
/// Configuration, validation and builder errors are returned synchronously from the
/// call that caused them. Execution errors always travel through the completion channel
/// (callback argument or deferred value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Builder,
    Execution,
}

#[derive(Debug, Error)]
pub enum SqlExecError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("No connection object supplied to the query executor")]
    NoConnection,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Table name not specified")]
    NoTableName,

    #[error("Where clause is not defined")]
    NoWhereClause,

    #[error("First parameter of get_where() must be a table name or a list of table names")]
    GetWhereTable,

    #[error("Second parameter of get_where() must be a record of column/value pairs")]
    GetWhereConditions,

    #[error("Query builder error: {0}")]
    BuilderError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unexpected result: {0}")]
    ResultError(String),
}

impl SqlExecError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoConnection | Self::ConfigError(_) => ErrorKind::Configuration,
            Self::NoTableName
            | Self::NoWhereClause
            | Self::GetWhereTable
            | Self::GetWhereConditions => ErrorKind::Validation,
            Self::BuilderError(_) => ErrorKind::Builder,
            #[cfg(feature = "sqlite")]
            Self::SqliteError(_) => ErrorKind::Execution,
            Self::ExecutionError(_) | Self::ResultError(_) => ErrorKind::Execution,
        }
    }

    /// True for errors that indicate a programming mistake rather than a runtime failure.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Configuration | ErrorKind::Validation | ErrorKind::Builder
        )
    }
}

impl From<tokio::task::JoinError> for SqlExecError {
    fn from(err: tokio::task::JoinError) -> Self {
        SqlExecError::ExecutionError(format!("driver task failed: {err}"))
    }
}
