//! The persisted "what has been applied" record.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Name recorded for a database that has never been migrated.
pub const UNINITIALIZED_NAME: &str = "-";

/// One row of the version-tracking table.
///
/// The row with the highest `number` is the database's current version.
/// `number == 0` means no migration has been applied yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaVersion {
    /// Highest migration version successfully applied
    pub number: u32,

    /// Name of the migration that produced this version
    pub name: String,

    /// When the migration was committed (absent before the first migration)
    pub applied_at: Option<NaiveDateTime>,
}

impl SchemaVersion {
    /// Sentinel for a database with no applied migrations.
    pub fn initial() -> Self {
        Self {
            number: 0,
            name: UNINITIALIZED_NAME.to_string(),
            applied_at: None,
        }
    }

    /// Record for a migration applied at `applied_at`.
    pub fn applied(number: u32, name: impl Into<String>, applied_at: NaiveDateTime) -> Self {
        Self {
            number,
            name: name.into(),
            applied_at: Some(applied_at),
        }
    }

    /// True when nothing has been applied yet.
    pub fn is_initial(&self) -> bool {
        self.number == 0
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.applied_at {
            Some(at) => write!(
                f,
                "{} ({}), applied {}",
                self.number,
                self.name,
                at.format("%Y-%m-%d %H:%M:%S")
            ),
            None => write!(f, "{} ({}), never applied", self.number, self.name),
        }
    }
}
