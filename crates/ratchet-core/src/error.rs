//! Error types for ratchet-core

use thiserror::Error;

/// Core error type for Ratchet
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Migrations directory could not be listed
    #[error("[E004] Cannot read migrations directory '{path}': {source}")]
    MigrationsDirUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// E005: Two migration files claim the same version number
    #[error("[E005] Duplicate migration version {version}: '{first}' and '{second}'")]
    DuplicateMigrationVersion {
        version: u32,
        first: String,
        second: String,
    },

    /// E006: SQL parser could not split a migration into statements
    #[error("[E006] Failed to parse SQL statements: {message}")]
    StatementParseError { message: String },

    /// E007: IO error with file path context
    #[error("[E007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}
