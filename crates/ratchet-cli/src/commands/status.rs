//! Status command implementation

use anyhow::{Context, Result};
use ratchet_core::SchemaVersion;
use ratchet_migrate::{UpgradeStatus, Upgrader};
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{print_json, ProjectContext};

/// JSON shape of `ratchet status`
#[derive(Serialize)]
struct StatusOutput<'a> {
    #[serde(flatten)]
    status: &'a UpgradeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<&'a [SchemaVersion]>,
}

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let upgrader = Upgrader::from_config(&ctx.config);

    let Some(db) = ctx.connect_existing()? else {
        let status = upgrader
            .status_uninitialized(&ctx.migrations_dir)
            .context("Failed to read migration status")?;
        let history = args.history.then(Vec::new);
        return report(args.output, &status, history.as_deref());
    };

    let status = upgrader
        .status(&db, &ctx.migrations_dir)
        .await
        .context("Failed to read migration status")?;

    let history = if args.history {
        Some(
            upgrader
                .version_store()
                .history(&db)
                .await
                .context("Failed to read version history")?,
        )
    } else {
        None
    };

    report(args.output, &status, history.as_deref())
}

fn report(
    output: OutputFormat,
    status: &UpgradeStatus,
    history: Option<&[SchemaVersion]>,
) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(&StatusOutput { status, history }),
        OutputFormat::Table => {
            print_table(status, history);
            Ok(())
        }
    }
}

fn print_table(status: &UpgradeStatus, history: Option<&[SchemaVersion]>) {
    println!("Current version: {}", status.current);
    println!("Migrations found: {}", status.available);

    if let Some(history) = history {
        println!("\nApplied:");
        if history.is_empty() {
            println!("  (none)");
        }
        for version in history {
            let applied = version
                .applied_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  v{:<3} {:<30} {}", version.number, version.name, applied);
        }
    }

    if status.pending.is_empty() {
        println!("\nNo pending migrations.");
        return;
    }

    println!("\nPending ({}):", status.pending.len());
    for migration in &status.pending {
        println!("  v{:<3} {}", migration.version, migration.name);
    }
}
