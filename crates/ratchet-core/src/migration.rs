//! Migration file discovery.
//!
//! Migrations are plain `.sql` files named `v<N>-<Name>.sql`, where `N` is a
//! one or two digit version without a leading zero and `Name` is one or more
//! ASCII letters. They are applied in increasing order of `N`:
//!
//! ```text
//! migrations/
//!   v1-InitialSchema.sql
//!   v2-AddSchemaTable.sql
//! ```

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Filename pattern for migration files
const MIGRATION_FILE_PATTERN: &str = r"^v([1-9][0-9]?)-([a-zA-Z]+)\.sql$";

/// A discovered migration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    /// Version number parsed from the filename
    pub version: u32,

    /// Name parsed from the filename (letters only)
    pub name: String,

    /// Path used to load the migration's SQL
    pub path: PathBuf,
}

impl MigrationFile {
    /// Filename of the migration (e.g. `v1-InitialSchema.sql`)
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("v{}-{}.sql", self.version, self.name))
    }
}

impl fmt::Display for MigrationFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}-{}", self.version, self.name)
    }
}

/// Scans a directory for migration files.
///
/// Holds the compiled filename pattern so it is built once and reused for
/// every entry.
#[derive(Debug, Clone)]
pub struct MigrationLocator {
    pattern: Regex,
}

impl Default for MigrationLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationLocator {
    /// Create a locator with the standard filename pattern
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(MIGRATION_FILE_PATTERN).expect("valid regex"),
        }
    }

    /// Parse a filename into `(version, name)`.
    ///
    /// Returns `None` for names that do not match the migration pattern.
    pub fn parse_file_name(&self, file_name: &str) -> Option<(u32, String)> {
        let caps = self.pattern.captures(file_name)?;
        let version = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let name = caps.get(2)?.as_str().to_string();
        Some((version, name))
    }

    /// List `dir` and return its migrations sorted by ascending version.
    ///
    /// Entries that are not regular files or do not match the pattern are
    /// skipped. Two files with the same version are an error.
    pub fn discover(&self, dir: &Path) -> CoreResult<Vec<MigrationFile>> {
        let entries = std::fs::read_dir(dir).map_err(|e| unreadable(dir, e))?;

        let mut migrations = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| unreadable(dir, e))?;
            let file_type = entry.file_type().map_err(|e| unreadable(dir, e))?;
            if !file_type.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            match self.parse_file_name(file_name) {
                Some((version, name)) => migrations.push(MigrationFile {
                    version,
                    name,
                    path: entry.path(),
                }),
                None => log::debug!("Ignoring '{}': not a migration filename", file_name),
            }
        }

        migrations.sort_by_key(|m| m.version);
        reject_duplicates(&migrations)?;
        Ok(migrations)
    }
}

fn unreadable(dir: &Path, source: std::io::Error) -> CoreError {
    CoreError::MigrationsDirUnreadable {
        path: dir.display().to_string(),
        source,
    }
}

/// Fail if two adjacent (sorted) migrations share a version.
fn reject_duplicates(sorted: &[MigrationFile]) -> CoreResult<()> {
    for pair in sorted.windows(2) {
        if pair[0].version == pair[1].version {
            let (mut first, mut second) = (pair[0].file_name(), pair[1].file_name());
            if second < first {
                std::mem::swap(&mut first, &mut second);
            }
            return Err(CoreError::DuplicateMigrationVersion {
                version: pair[0].version,
                first,
                second,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
