//! ratchet-db - Database abstraction layer for Ratchet
//!
//! This crate provides the `Database` traits the migration engine runs
//! against and their DuckDB implementation. Driver errors are classified
//! into [`DbError`] kinds here, at the boundary with the SQL engine.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, DatabaseCore, DatabaseTransaction, DatabaseVersioning};
