//! Error types for ratchet-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Unique / primary key / check constraint violated (D004)
    #[error("[D004] Constraint violation: {0}")]
    ConstraintViolation(String),

    /// BEGIN / COMMIT / ROLLBACK failed (D005)
    #[error("[D005] Transaction control failed: {0}")]
    TransactionError(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (D007)
    #[error("[D007] Internal database error: {0}")]
    Internal(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose catalog or constraint failures as
        // distinct variants; the message prefix is the only signal, so the
        // classification happens here and nowhere else.
        let msg = err.to_string();
        if is_missing_relation(&msg) {
            DbError::TableNotFound(msg)
        } else if msg.contains("Constraint Error")
            || msg.contains("violates primary key")
            || msg.contains("violates unique constraint")
        {
            DbError::ConstraintViolation(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

/// Catalog errors for a relation that does not exist. "Table with name X
/// already exists!" shares the prefix and must stay an execution error.
fn is_missing_relation(msg: &str) -> bool {
    let named = msg.contains("Table with name")
        || msg.contains("View with name")
        || msg.contains("Table or view with name");
    let missing = msg.contains("does not exist") || msg.contains("not found");
    (named && missing)
        || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
}
