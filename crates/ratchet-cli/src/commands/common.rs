//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use ratchet_core::{Config, DbType, MEMORY_DB_PATH};
use ratchet_db::DuckDbBackend;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Config plus the resolved locations a command works against.
pub(crate) struct ProjectContext {
    pub(crate) config: Config,
    pub(crate) migrations_dir: PathBuf,
    pub(crate) database_path: String,
}

impl ProjectContext {
    /// Load ratchet.yml (or defaults) and apply CLI overrides.
    pub(crate) fn load(global: &GlobalArgs) -> Result<Self> {
        let root = Path::new(&global.project_dir);

        let mut config = match &global.config {
            Some(path) => Config::load(&root.join(path)).context("Failed to load config")?,
            None => Config::load_or_default(root).context("Failed to load config")?,
        };

        if let Some(database) = &global.database {
            config.database.path = database.clone();
        }
        config.validate().context("Invalid configuration")?;

        let migrations_dir = match &global.migrations_dir {
            Some(dir) => PathBuf::from(dir),
            None => config.migrations_path_absolute(root),
        };

        // An explicit --database is taken as given, not relative to the project.
        let database_path = match &global.database {
            Some(database) => database.clone(),
            None => config.database_path(root),
        };

        if global.verbose {
            eprintln!(
                "[verbose] migrations: {}, database: {} ({}), version table: {}",
                migrations_dir.display(),
                database_path,
                config.database.db_type,
                config.version_table
            );
        }

        Ok(Self {
            config,
            migrations_dir,
            database_path,
        })
    }

    /// Open the configured database only if it already exists.
    ///
    /// Read-only commands use this so that inspecting a project never
    /// creates a database file.
    pub(crate) fn connect_existing(&self) -> Result<Option<DuckDbBackend>> {
        if self.database_path != MEMORY_DB_PATH && !Path::new(&self.database_path).exists() {
            return Ok(None);
        }
        self.connect().map(Some)
    }

    /// Open the configured database.
    pub(crate) fn connect(&self) -> Result<DuckDbBackend> {
        match self.config.database.db_type {
            DbType::DuckDb => DuckDbBackend::new(&self.database_path)
                .with_context(|| format!("Failed to connect to database: {}", self.database_path)),
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
