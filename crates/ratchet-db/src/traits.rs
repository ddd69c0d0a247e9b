//! Database trait definitions

use crate::error::DbResult;
use async_trait::async_trait;
use ratchet_core::SchemaVersion;

/// Core statement execution
///
/// The engine only needs `execute_batch` and `db_type`. The remaining
/// methods back test assertions and ad-hoc inspection.
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute one or more SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Explicit transaction control on the backend's connection
#[async_trait]
pub trait DatabaseTransaction: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;
}

/// Access to the version-tracking table
///
/// `table` is a validated plain or schema-qualified identifier.
#[async_trait]
pub trait DatabaseVersioning: Send + Sync {
    /// Create the version-tracking table
    async fn create_version_table(&self, table: &str) -> DbResult<()>;

    /// Row with the highest version, `None` if the table is empty.
    ///
    /// Must fail with [`DbError::TableNotFound`](crate::DbError::TableNotFound)
    /// when the table does not exist.
    async fn latest_version(&self, table: &str) -> DbResult<Option<SchemaVersion>>;

    /// Insert one row. A duplicate version must fail with
    /// [`DbError::ConstraintViolation`](crate::DbError::ConstraintViolation).
    async fn insert_version(&self, table: &str, version: &SchemaVersion) -> DbResult<()>;

    /// All rows, ascending by version
    async fn applied_versions(&self, table: &str) -> DbResult<Vec<SchemaVersion>>;
}

/// Everything the migration engine needs from a backend
pub trait Database: DatabaseCore + DatabaseTransaction + DatabaseVersioning {}

impl<T: DatabaseCore + DatabaseTransaction + DatabaseVersioning> Database for T {}
