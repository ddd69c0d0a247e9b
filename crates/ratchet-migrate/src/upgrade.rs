//! Upgrade orchestration: discover, read current version, apply pending, report.

use crate::applier::MigrationApplier;
use crate::error::MigrateResult;
use crate::version_store::VersionStore;
use ratchet_core::{Config, MigrationFile, MigrationLocator, SchemaVersion, StatementSplitter};
use ratchet_db::Database;
use serde::Serialize;
use std::path::Path;

/// Outcome of a successful upgrade
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeReport {
    /// Version before any migration was applied
    pub initial: SchemaVersion,

    /// Versions applied by this run, in order
    pub applied: Vec<SchemaVersion>,

    /// Version read back after the run
    pub current: SchemaVersion,
}

impl UpgradeReport {
    /// True when nothing was pending
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Current version and what an upgrade would apply
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeStatus {
    /// Version currently recorded
    pub current: SchemaVersion,

    /// Number of migration files discovered
    pub available: usize,

    /// Migrations newer than `current`, in apply order
    pub pending: Vec<MigrationFile>,
}

impl UpgradeStatus {
    fn new(current: SchemaVersion, migrations: Vec<MigrationFile>) -> Self {
        let pending = pending_after(&migrations, current.number)
            .cloned()
            .collect();
        Self {
            current,
            available: migrations.len(),
            pending,
        }
    }
}

/// Drives a full upgrade against one database.
#[derive(Debug, Clone)]
pub struct Upgrader {
    locator: MigrationLocator,
    store: VersionStore,
    applier: MigrationApplier,
}

impl Upgrader {
    /// Upgrader recording into `table` and splitting with `splitter`
    pub fn new(table: &str, splitter: StatementSplitter) -> Self {
        Self {
            locator: MigrationLocator::new(),
            store: VersionStore::new(table),
            applier: MigrationApplier::new(table, splitter),
        }
    }

    /// Upgrader configured from a project config
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.version_table, config.statement_splitter)
    }

    /// The version store this upgrader reads from
    pub fn version_store(&self) -> &VersionStore {
        &self.store
    }

    /// Apply every migration in `dir` newer than the recorded version.
    ///
    /// Migrations run one at a time in ascending order, each in its own
    /// transaction. The first failure stops the run; migrations committed
    /// before it stay applied.
    pub async fn upgrade(&self, db: &dyn Database, dir: &Path) -> MigrateResult<UpgradeReport> {
        log::info!("Performing db schema upgrade ({})...", db.db_type());

        let migrations = self.locator.discover(dir)?;
        let initial = self.store.current_version(db).await?;
        log::info!("Current db version: {}", initial);

        let mut applied = Vec::new();
        for migration in pending_after(&migrations, initial.number) {
            applied.push(self.applier.apply(migration, db).await?);
        }

        let current = self.store.current_version(db).await?;
        log::info!("Updated db version: {}", current);

        Ok(UpgradeReport {
            initial,
            applied,
            current,
        })
    }

    /// Report the recorded version and pending migrations without applying.
    ///
    /// Read-only: a missing version table is reported as the initial version
    /// and is not created.
    pub async fn status(&self, db: &dyn Database, dir: &Path) -> MigrateResult<UpgradeStatus> {
        let migrations = self.locator.discover(dir)?;
        let current = self.store.peek_version(db).await?;
        Ok(UpgradeStatus::new(current, migrations))
    }

    /// Status for a database that does not exist yet: everything is pending.
    pub fn status_uninitialized(&self, dir: &Path) -> MigrateResult<UpgradeStatus> {
        let migrations = self.locator.discover(dir)?;
        Ok(UpgradeStatus::new(SchemaVersion::initial(), migrations))
    }

    /// Discover migrations in `dir` without touching the database.
    pub fn discover(&self, dir: &Path) -> MigrateResult<Vec<MigrationFile>> {
        Ok(self.locator.discover(dir)?)
    }
}

/// Migrations newer than `current`, preserving (ascending) order.
fn pending_after(
    migrations: &[MigrationFile],
    current: u32,
) -> impl Iterator<Item = &MigrationFile> {
    migrations.iter().filter(move |m| m.version > current)
}

#[cfg(test)]
#[path = "upgrade_test.rs"]
mod tests;
