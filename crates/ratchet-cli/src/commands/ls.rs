//! List command implementation

use anyhow::{Context, Result};
use ratchet_migrate::Upgrader;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::commands::common::{print_json, ProjectContext};

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let migrations = Upgrader::from_config(&ctx.config)
        .discover(&ctx.migrations_dir)
        .context("Failed to list migrations")?;

    match args.output {
        OutputFormat::Json => print_json(&migrations),
        OutputFormat::Table => {
            if migrations.is_empty() {
                println!("No migrations found in {}", ctx.migrations_dir.display());
                return Ok(());
            }

            println!("{:<8} {:<30} FILE", "VERSION", "NAME");
            for m in &migrations {
                println!("{:<8} {:<30} {}", m.version, m.name, m.file_name());
            }
            println!("\n{} migrations", migrations.len());
            Ok(())
        }
    }
}
