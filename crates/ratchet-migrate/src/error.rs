//! Error types for the migration engine.

use ratchet_core::CoreError;
use ratchet_db::DbError;
use thiserror::Error;

/// Migration engine errors.
///
/// Every variant is fatal for the run: nothing is retried and no later
/// migration is attempted. Per-migration variants name the migration.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Migrations directory could not be scanned (M001).
    #[error("[M001] Migration discovery failed: {0}")]
    Discovery(#[from] CoreError),

    /// Version table was missing and could not be created (M002).
    #[error("[M002] Failed to create version table '{table}': {source}")]
    Bootstrap {
        table: String,
        #[source]
        source: DbError,
    },

    /// Version table exists but could not be read (M003).
    #[error("[M003] Failed to read current version from '{table}': {source}")]
    VersionRead {
        table: String,
        #[source]
        source: DbError,
    },

    /// Migration file has no content (M004).
    #[error("[M004] Migration v{version} '{name}' is empty: {path}")]
    EmptyMigration {
        version: u32,
        name: String,
        path: String,
    },

    /// Migration file could not be read (M005).
    #[error("[M005] Failed to read migration v{version} '{name}' from {path}: {source}")]
    ReadMigration {
        version: u32,
        name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Migration content could not be split into statements (M006).
    #[error("[M006] Failed to split migration v{version} '{name}': {source}")]
    StatementSplit {
        version: u32,
        name: String,
        #[source]
        source: CoreError,
    },

    /// Transaction could not be opened (M007).
    #[error("[M007] Failed to begin transaction for migration v{version} '{name}': {source}")]
    Transaction {
        version: u32,
        name: String,
        #[source]
        source: DbError,
    },

    /// A statement failed; the migration was rolled back (M008).
    #[error("[M008] Migration v{version} '{name}' failed at statement {statement}: {source}")]
    StatementExecution {
        version: u32,
        name: String,
        /// 1-based position of the failing statement
        statement: usize,
        #[source]
        source: DbError,
    },

    /// Version record or commit failed; the migration was rolled back (M009).
    #[error("[M009] Failed to record migration v{version} '{name}': {source}")]
    RecordCommit {
        version: u32,
        name: String,
        #[source]
        source: DbError,
    },

    /// Version already recorded by another runner; the migration was rolled back (M010).
    #[error("[M010] Migration v{version} '{name}' was already recorded by a concurrent upgrade: {source}")]
    VersionConflict {
        version: u32,
        name: String,
        #[source]
        source: DbError,
    },
}

impl MigrateError {
    /// Version of the migration that failed, if the error is tied to one.
    pub fn migration_version(&self) -> Option<u32> {
        match self {
            MigrateError::EmptyMigration { version, .. }
            | MigrateError::ReadMigration { version, .. }
            | MigrateError::StatementSplit { version, .. }
            | MigrateError::Transaction { version, .. }
            | MigrateError::StatementExecution { version, .. }
            | MigrateError::RecordCommit { version, .. }
            | MigrateError::VersionConflict { version, .. } => Some(*version),
            MigrateError::Discovery(_)
            | MigrateError::Bootstrap { .. }
            | MigrateError::VersionRead { .. } => None,
        }
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
