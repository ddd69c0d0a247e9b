use super::*;
use crate::cli::{LsArgs, OutputFormat, StatusArgs, UpArgs};
use crate::commands::{ls, status, up};
use ratchet_db::DatabaseCore;
use tempfile::TempDir;

fn global(project_dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.display().to_string(),
        config: None,
        database: None,
        migrations_dir: None,
    }
}

fn write_migrations(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("v1-InitialSchema.sql"),
        "CREATE TABLE accounts (id INT);",
    )
    .unwrap();
    std::fs::write(
        dir.join("v2-AddEmail.sql"),
        "ALTER TABLE accounts ADD COLUMN email VARCHAR;",
    )
    .unwrap();
}

#[test]
fn test_defaults_resolve_against_project_dir() {
    let project = TempDir::new().unwrap();
    let ctx = ProjectContext::load(&global(project.path())).unwrap();

    assert_eq!(ctx.migrations_dir, project.path().join("migrations"));
    assert_eq!(
        ctx.database_path,
        project.path().join("ratchet.duckdb").display().to_string()
    );
    assert_eq!(ctx.config.version_table, "db_versions");
}

#[test]
fn test_config_file_and_overrides() {
    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("ratchet.yml"),
        "migrations_path: sql\nversion_table: history\ndatabase:\n  path: app.duckdb\n",
    )
    .unwrap();

    let ctx = ProjectContext::load(&global(project.path())).unwrap();
    assert_eq!(ctx.migrations_dir, project.path().join("sql"));
    assert_eq!(ctx.config.version_table, "history");

    let mut args = global(project.path());
    args.database = Some(":memory:".to_string());
    args.migrations_dir = Some("/elsewhere".to_string());
    let ctx = ProjectContext::load(&args).unwrap();
    assert_eq!(ctx.database_path, ":memory:");
    assert_eq!(ctx.migrations_dir, PathBuf::from("/elsewhere"));
}

#[test]
fn test_invalid_config_is_reported() {
    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("ratchet.yml"),
        "version_table: \"bad name\"\n",
    )
    .unwrap();
    assert!(ProjectContext::load(&global(project.path())).is_err());
}

#[test]
fn test_relative_config_resolves_against_project_dir() {
    let project = TempDir::new().unwrap();
    std::fs::create_dir_all(project.path().join("conf")).unwrap();
    std::fs::write(
        project.path().join("conf/ratchet.yml"),
        "version_table: applied_versions\n",
    )
    .unwrap();

    let mut args = global(project.path());
    args.config = Some("conf/ratchet.yml".to_string());
    let ctx = ProjectContext::load(&args).unwrap();
    assert_eq!(ctx.config.version_table, "applied_versions");
}

#[tokio::test]
async fn test_dry_run_and_status_leave_database_untouched() {
    let project = TempDir::new().unwrap();
    write_migrations(&project.path().join("migrations"));
    let args = global(project.path());

    up::execute(&UpArgs { dry_run: true }, &args).await.unwrap();
    status::execute(
        &StatusArgs {
            output: OutputFormat::Json,
            history: true,
        },
        &args,
    )
    .await
    .unwrap();
    assert!(!project.path().join("ratchet.duckdb").exists());

    // Existing database without a version table stays without one.
    let ctx = ProjectContext::load(&args).unwrap();
    drop(ctx.connect().unwrap());
    up::execute(&UpArgs { dry_run: true }, &args).await.unwrap();
    let db = ctx.connect().unwrap();
    assert!(!db.relation_exists("db_versions").await.unwrap());
}

#[tokio::test]
async fn test_commands_against_file_database() {
    let project = TempDir::new().unwrap();
    write_migrations(&project.path().join("migrations"));
    let args = global(project.path());

    ls::execute(
        &LsArgs {
            output: OutputFormat::Json,
        },
        &args,
    )
    .await
    .unwrap();

    up::execute(&UpArgs { dry_run: true }, &args).await.unwrap();
    up::execute(&UpArgs { dry_run: false }, &args).await.unwrap();
    // Second run has nothing to do.
    up::execute(&UpArgs { dry_run: false }, &args).await.unwrap();

    status::execute(
        &StatusArgs {
            output: OutputFormat::Table,
            history: true,
        },
        &args,
    )
    .await
    .unwrap();

    let ctx = ProjectContext::load(&args).unwrap();
    let db = ctx.connect().unwrap();
    let status = ratchet_migrate::Upgrader::from_config(&ctx.config)
        .status(&db, &ctx.migrations_dir)
        .await
        .unwrap();
    assert_eq!(status.current.number, 2);
    assert_eq!(status.current.name, "AddEmail");
    assert!(status.pending.is_empty());
}

#[tokio::test]
async fn test_up_fails_on_broken_migration() {
    let project = TempDir::new().unwrap();
    let migrations = project.path().join("migrations");
    write_migrations(&migrations);
    std::fs::write(migrations.join("v3-Broken.sql"), "NOT SQL AT ALL;").unwrap();

    let err = up::execute(&UpArgs { dry_run: false }, &global(project.path()))
        .await
        .unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("v3 'Broken'"), "{chain}");
}
