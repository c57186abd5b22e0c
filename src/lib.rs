//! Query execution adapter between a SQL-generating query builder and an async
//! database connection.
//!
//! - Driver responses are normalized into [`NormalizedResult`], exposing `insert_id`,
//!   `affected_rows` and `changed_rows` whatever names the driver used.
//! - Every operation of [`QueryExec`] returns a [`PendingOperation`] that can be run with
//!   a completion callback or as a future, through one shared code path.
//! - [`QueryExec::update_batch`] runs the builder's statement chunks one at a time and
//!   reports accumulated results together with every partial failure.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sql_query_exec::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlExecError> {
//! let conn = SqliteConnection::open(SqliteOptions::new("app.db".into())).await?;
//! let exec = QueryExec::new(BasicQueryBuilder::ansi_strings(), Arc::new(conn));
//!
//! let updated = exec
//!     .update(
//!         "users",
//!         vec![("active".into(), RowValues::Bool(false))],
//!         Some(WhereClause::eq("id", 7)),
//!     )?
//!     .run()
//!     .await?;
//! println!("{:?} rows updated", updated.affected_rows);
//! # Ok(()) }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod query_builder;
pub mod query_exec;
pub mod results;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ExecOptions;
pub use connection::Connection;
pub use error::{ErrorKind, SqlExecError};
pub use executor::{Deferred, Executor, PendingOperation};
pub use query_builder::{BasicQueryBuilder, QueryBuilder};
pub use query_exec::{QueryExec, QueryExecBuilder};
pub use results::{CustomDbRow, NormalizedResult, RawResult, ResultFields, normalize};
pub use types::{Record, RowValues, Tables, WhereClause};
