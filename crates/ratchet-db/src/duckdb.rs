//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCore, DatabaseTransaction, DatabaseVersioning};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use duckdb::Connection;
use ratchet_core::SchemaVersion;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Timestamp layout DuckDB produces for `CAST(ts AS VARCHAR)`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// DuckDB database backend
///
/// All calls go through one mutex-guarded connection, so `begin` / `commit`
/// bracket every statement issued in between.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute(sql, [])?)
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        Ok(conn.execute_batch(sql)?)
    }

    /// Run a transaction-control statement
    fn transaction_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::TransactionError(format!("{sql} failed: {e}")))
    }

    /// Query count synchronously
    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        // Handle schema-qualified names
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn create_version_table_sync(&self, table: &str) -> DbResult<()> {
        let conn = self.lock()?;
        if let Some(pos) = table.rfind('.') {
            conn.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {}", &table[..pos]))?;
        }
        conn.execute_batch(&format!(
            "CREATE TABLE {table} (
                 version INTEGER PRIMARY KEY NOT NULL,
                 name    VARCHAR(50) NOT NULL,
                 applied TIMESTAMP
             )"
        ))?;
        Ok(())
    }

    fn select_versions_sync(&self, sql: &str) -> DbResult<Vec<SchemaVersion>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;

        let mut versions = Vec::new();
        while let Some(row) = rows.next()? {
            let number: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            let applied: Option<String> = row.get(2)?;
            versions.push(version_from_parts(number, name, applied)?);
        }
        Ok(versions)
    }

    fn insert_version_sync(&self, table: &str, version: &SchemaVersion) -> DbResult<()> {
        let conn = self.lock()?;
        let applied = version
            .applied_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S%.6f").to_string());
        conn.execute(
            &format!(
                "INSERT INTO {table} (version, name, applied) VALUES (?, ?, CAST(? AS TIMESTAMP))"
            ),
            duckdb::params![i64::from(version.number), version.name, applied],
        )?;
        Ok(())
    }
}

fn version_from_parts(
    number: i64,
    name: String,
    applied: Option<String>,
) -> DbResult<SchemaVersion> {
    let number = u32::try_from(number)
        .map_err(|_| DbError::Internal(format!("version {number} out of range")))?;
    let applied_at = applied
        .map(|s| {
            NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT)
                .map_err(|e| DbError::Internal(format!("bad applied timestamp '{s}': {e}")))
        })
        .transpose()?;
    Ok(SchemaVersion {
        number,
        name,
        applied_at,
    })
}

#[async_trait]
impl DatabaseCore for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl DatabaseTransaction for DuckDbBackend {
    async fn begin(&self) -> DbResult<()> {
        self.transaction_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("ROLLBACK")
    }
}

#[async_trait]
impl DatabaseVersioning for DuckDbBackend {
    async fn create_version_table(&self, table: &str) -> DbResult<()> {
        self.create_version_table_sync(table)
    }

    async fn latest_version(&self, table: &str) -> DbResult<Option<SchemaVersion>> {
        let sql = format!(
            "SELECT version, name, CAST(applied AS VARCHAR) FROM {table} ORDER BY version DESC LIMIT 1"
        );
        Ok(self.select_versions_sync(&sql)?.into_iter().next())
    }

    async fn insert_version(&self, table: &str, version: &SchemaVersion) -> DbResult<()> {
        self.insert_version_sync(table, version)
    }

    async fn applied_versions(&self, table: &str) -> DbResult<Vec<SchemaVersion>> {
        let sql = format!(
            "SELECT version, name, CAST(applied AS VARCHAR) FROM {table} ORDER BY version ASC"
        );
        self.select_versions_sync(&sql)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
