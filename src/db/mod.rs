//! Database module: SQL repositories and the report store adapter.
//!
//! - `repo`: SQL-only functions that map rows into `crate::model` types.
//! - `store`: `SqliteStore`, the `ReportStore` implementation over `repo`.
//!
//! Callers import from `standup_bot::db`; the repository API is re-exported.

pub mod repo;
pub mod store;

pub use repo::*;
pub use store::SqliteStore;
