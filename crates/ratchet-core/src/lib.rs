//! ratchet-core - Core library for Ratchet
//!
//! This crate provides the shared types used across Ratchet: project
//! configuration, migration file discovery, the persisted schema version
//! record, and splitting migration content into statements.

pub mod config;
pub mod error;
pub mod migration;
pub mod schema_version;
pub mod statement;

pub use config::{Config, DatabaseConfig, DbType, MEMORY_DB_PATH};
pub use error::{CoreError, CoreResult};
pub use migration::{MigrationFile, MigrationLocator};
pub use schema_version::SchemaVersion;
pub use statement::StatementSplitter;
