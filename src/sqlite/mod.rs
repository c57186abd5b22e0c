//! `SQLite` driver backed by `rusqlite`.

pub mod config;
pub mod connection;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connection::SqliteConnection;
pub use query::{build_raw_result, sqlite_extract_value_sync};
