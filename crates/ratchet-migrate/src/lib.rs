//! Migration engine for Ratchet.
//!
//! Brings a database up to the newest migration in a directory:
//! [`Upgrader`] discovers `v<N>-<Name>.sql` files, asks the [`VersionStore`]
//! for the recorded version, and hands each newer migration to the
//! [`MigrationApplier`], which runs it in its own transaction together with
//! the version record. There is no down path.
//!
//! Two runners racing on one database are not locked against each other;
//! the loser's version insert hits the primary key and its migration is
//! rolled back with [`MigrateError::VersionConflict`].

pub mod applier;
pub mod error;
pub mod upgrade;
pub mod version_store;

pub use applier::MigrationApplier;
pub use error::{MigrateError, MigrateResult};
pub use upgrade::{UpgradeReport, UpgradeStatus, Upgrader};
pub use version_store::VersionStore;
