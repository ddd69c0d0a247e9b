//! Applies a single migration inside its own transaction.

use crate::error::{MigrateError, MigrateResult};
use chrono::{SubsecRound, Utc};
use ratchet_core::{MigrationFile, SchemaVersion, StatementSplitter};
use ratchet_db::{Database, DbError};

/// Runs one migration file's statements and records its version atomically.
#[derive(Debug, Clone)]
pub struct MigrationApplier {
    table: String,
    splitter: StatementSplitter,
}

impl MigrationApplier {
    /// Applier recording into `table`, splitting content with `splitter`.
    pub fn new(table: impl Into<String>, splitter: StatementSplitter) -> Self {
        Self {
            table: table.into(),
            splitter,
        }
    }

    /// Apply `migration` and return the version row it recorded.
    ///
    /// The file is loaded and split before any transaction is opened. All
    /// statements and the version insert share one transaction: on any
    /// failure the transaction is rolled back and nothing of this migration
    /// remains.
    pub async fn apply(
        &self,
        migration: &MigrationFile,
        db: &dyn Database,
    ) -> MigrateResult<SchemaVersion> {
        log::info!(
            "Applying migration {} - '{}'",
            migration.version,
            migration.name
        );

        let statements = self.load_statements(migration)?;

        db.begin()
            .await
            .map_err(|source| MigrateError::Transaction {
                version: migration.version,
                name: migration.name.clone(),
                source,
            })?;

        for (index, statement) in statements.iter().enumerate() {
            log::debug!("v{} [{}]: {}", migration.version, index + 1, statement);
            if let Err(source) = db.execute_batch(statement).await {
                rollback(db, migration).await;
                return Err(MigrateError::StatementExecution {
                    version: migration.version,
                    name: migration.name.clone(),
                    statement: index + 1,
                    source,
                });
            }
        }

        // Microseconds: the precision the version table stores.
        let record = SchemaVersion::applied(
            migration.version,
            migration.name.clone(),
            Utc::now().naive_utc().trunc_subsecs(6),
        );

        if let Err(source) = db.insert_version(&self.table, &record).await {
            rollback(db, migration).await;
            return Err(match source {
                DbError::ConstraintViolation(_) => MigrateError::VersionConflict {
                    version: migration.version,
                    name: migration.name.clone(),
                    source,
                },
                source => MigrateError::RecordCommit {
                    version: migration.version,
                    name: migration.name.clone(),
                    source,
                },
            });
        }

        if let Err(source) = db.commit().await {
            rollback(db, migration).await;
            return Err(MigrateError::RecordCommit {
                version: migration.version,
                name: migration.name.clone(),
                source,
            });
        }

        Ok(record)
    }

    /// Read the migration file and split it into statements.
    fn load_statements(&self, migration: &MigrationFile) -> MigrateResult<Vec<String>> {
        let content = std::fs::read_to_string(&migration.path).map_err(|source| {
            MigrateError::ReadMigration {
                version: migration.version,
                name: migration.name.clone(),
                path: migration.path.display().to_string(),
                source,
            }
        })?;

        if content.is_empty() {
            return Err(MigrateError::EmptyMigration {
                version: migration.version,
                name: migration.name.clone(),
                path: migration.path.display().to_string(),
            });
        }

        self.splitter
            .split(&content)
            .map_err(|source| MigrateError::StatementSplit {
                version: migration.version,
                name: migration.name.clone(),
                source,
            })
    }
}

/// Roll back, keeping the original failure as the reported error.
async fn rollback(db: &dyn Database, migration: &MigrationFile) {
    if let Err(e) = db.rollback().await {
        log::warn!(
            "Rollback of migration v{} '{}' failed: {}",
            migration.version,
            migration.name,
            e
        );
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
