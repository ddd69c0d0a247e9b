//! Up command implementation

use anyhow::{Context, Result};
use ratchet_migrate::Upgrader;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::ProjectContext;

/// Execute the up command
pub async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let upgrader = Upgrader::from_config(&ctx.config);

    if args.dry_run {
        let status = match ctx.connect_existing()? {
            Some(db) => upgrader.status(&db, &ctx.migrations_dir).await,
            None => upgrader.status_uninitialized(&ctx.migrations_dir),
        }
        .context("Failed to determine pending migrations")?;

        if status.pending.is_empty() {
            println!(
                "Database is up to date at version {}.",
                status.current.number
            );
        } else {
            println!(
                "Would apply {} migration(s) on top of version {}:",
                status.pending.len(),
                status.current.number
            );
            for migration in &status.pending {
                println!("  v{:<3} {}", migration.version, migration.name);
            }
        }
        return Ok(());
    }

    let db = ctx.connect()?;
    let report = upgrader
        .upgrade(&db, &ctx.migrations_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to upgrade database schema ({})",
                ctx.migrations_dir.display()
            )
        })?;

    if report.is_noop() {
        println!(
            "Database is up to date at version {}.",
            report.current.number
        );
        return Ok(());
    }

    for applied in &report.applied {
        println!("  ✓ v{:<3} {}", applied.number, applied.name);
    }
    println!(
        "\nUpgraded from version {} to {}.",
        report.initial.number, report.current
    );
    Ok(())
}
