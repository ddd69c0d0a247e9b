//! Reads the current schema version, creating the version table on first use.

use crate::error::{MigrateError, MigrateResult};
use ratchet_core::SchemaVersion;
use ratchet_db::{Database, DbError};

/// Reader for the version-tracking table.
#[derive(Debug, Clone)]
pub struct VersionStore {
    table: String,
}

impl VersionStore {
    /// Store backed by `table` (a validated identifier).
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Name of the version-tracking table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Latest applied version.
    ///
    /// A missing table is created and reported as [`SchemaVersion::initial`].
    /// An existing but empty table reads the same way.
    pub async fn current_version(&self, db: &dyn Database) -> MigrateResult<SchemaVersion> {
        match db.latest_version(&self.table).await {
            Ok(Some(version)) => Ok(version),
            Ok(None) => Ok(SchemaVersion::initial()),
            Err(DbError::TableNotFound(_)) => {
                log::info!("Version table '{}' not found, creating it", self.table);
                db.create_version_table(&self.table)
                    .await
                    .map_err(|source| MigrateError::Bootstrap {
                        table: self.table.clone(),
                        source,
                    })?;
                Ok(SchemaVersion::initial())
            }
            Err(source) => Err(MigrateError::VersionRead {
                table: self.table.clone(),
                source,
            }),
        }
    }

    /// Latest applied version without creating anything.
    ///
    /// A missing table reads as [`SchemaVersion::initial`] and stays missing.
    pub async fn peek_version(&self, db: &dyn Database) -> MigrateResult<SchemaVersion> {
        match db.latest_version(&self.table).await {
            Ok(version) => Ok(version.unwrap_or_default()),
            Err(DbError::TableNotFound(_)) => Ok(SchemaVersion::initial()),
            Err(source) => Err(MigrateError::VersionRead {
                table: self.table.clone(),
                source,
            }),
        }
    }

    /// Every recorded version, oldest first. Empty if the table is missing.
    pub async fn history(&self, db: &dyn Database) -> MigrateResult<Vec<SchemaVersion>> {
        match db.applied_versions(&self.table).await {
            Ok(versions) => Ok(versions),
            Err(DbError::TableNotFound(_)) => Ok(Vec::new()),
            Err(source) => Err(MigrateError::VersionRead {
                table: self.table.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[path = "version_store_test.rs"]
mod tests;
