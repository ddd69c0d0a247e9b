use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parse_up_with_global_overrides() {
    let cli = Cli::try_parse_from([
        "ratchet",
        "up",
        "--database",
        ":memory:",
        "-m",
        "setup/migrations",
        "--dry-run",
    ])
    .unwrap();

    assert_eq!(cli.global.database.as_deref(), Some(":memory:"));
    assert_eq!(cli.global.migrations_dir.as_deref(), Some("setup/migrations"));
    match cli.command {
        Commands::Up(args) => assert!(args.dry_run),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_status_json() {
    let cli = Cli::try_parse_from(["ratchet", "-v", "status", "-o", "json", "--history"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, ".");
    match cli.command {
        Commands::Status(args) => {
            assert_eq!(args.output, OutputFormat::Json);
            assert!(args.history);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_unknown_output() {
    assert!(Cli::try_parse_from(["ratchet", "ls", "--output", "tree"]).is_err());
}
