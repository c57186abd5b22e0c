//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::ExecOptions;
pub use crate::connection::Connection;
pub use crate::error::{ErrorKind, SqlExecError};
pub use crate::executor::{Deferred, Executor, PendingOperation};
pub use crate::query_builder::{BasicQueryBuilder, QueryBuilder};
pub use crate::query_exec::{QueryExec, QueryExecBuilder};
pub use crate::results::{
    CustomDbRow, NormalizedResult, RawResult, ResultFields, normalize, normalize_with,
};
pub use crate::types::{Record, RowValues, Tables, WhereClause};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnection, SqliteOptions, SqliteOptionsBuilder};
