use super::*;
use crate::version_store::VersionStore;
use ratchet_db::{DatabaseCore, DatabaseTransaction, DatabaseVersioning, DuckDbBackend};
use std::path::PathBuf;
use tempfile::TempDir;

fn migration(dir: &TempDir, version: u32, name: &str, sql: &str) -> MigrationFile {
    let path = dir.path().join(format!("v{version}-{name}.sql"));
    std::fs::write(&path, sql).unwrap();
    MigrationFile {
        version,
        name: name.to_string(),
        path,
    }
}

async fn bootstrapped_db() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    VersionStore::new("db_versions")
        .current_version(&db)
        .await
        .unwrap();
    db
}

fn applier() -> MigrationApplier {
    MigrationApplier::new("db_versions", StatementSplitter::Semicolon)
}

#[tokio::test]
async fn test_apply_runs_statements_and_records_version() {
    let dir = TempDir::new().unwrap();
    let db = bootstrapped_db().await;
    let m = migration(
        &dir,
        1,
        "InitialSchema",
        "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\nINSERT INTO t VALUES (2);\n",
    );

    let record = applier().apply(&m, &db).await.unwrap();
    assert_eq!(record.number, 1);
    assert_eq!(record.name, "InitialSchema");
    assert!(record.applied_at.is_some());

    assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 2);
    let latest = db.latest_version("db_versions").await.unwrap().unwrap();
    assert_eq!(latest.number, 1);
    assert_eq!(latest.name, "InitialSchema");
}

#[tokio::test]
async fn test_failed_statement_rolls_back_everything() {
    let dir = TempDir::new().unwrap();
    let db = bootstrapped_db().await;
    let m = migration(
        &dir,
        1,
        "Broken",
        "CREATE TABLE t (id INT); THIS IS NOT SQL; CREATE TABLE u (id INT);",
    );

    let err = applier().apply(&m, &db).await.unwrap_err();
    match &err {
        MigrateError::StatementExecution {
            version,
            name,
            statement,
            ..
        } => {
            assert_eq!(*version, 1);
            assert_eq!(name, "Broken");
            assert_eq!(*statement, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(!db.relation_exists("t").await.unwrap());
    assert!(!db.relation_exists("u").await.unwrap());
    assert_eq!(db.latest_version("db_versions").await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_file_rejected_without_transaction() {
    let dir = TempDir::new().unwrap();
    let db = bootstrapped_db().await;
    let m = migration(&dir, 4, "Nothing", "");

    let err = applier().apply(&m, &db).await.unwrap_err();
    assert!(matches!(err, MigrateError::EmptyMigration { version: 4, .. }));
    assert_eq!(err.migration_version(), Some(4));

    // No transaction was left open: an explicit commit has nothing to commit.
    assert!(db.commit().await.is_err());
}

#[tokio::test]
async fn test_whitespace_only_file_records_version() {
    let dir = TempDir::new().unwrap();
    let db = bootstrapped_db().await;
    let m = migration(&dir, 1, "Blank", " \n ; \n");

    applier().apply(&m, &db).await.unwrap();
    let latest = db.latest_version("db_versions").await.unwrap().unwrap();
    assert_eq!(latest.number, 1);
}

#[tokio::test]
async fn test_missing_file_is_read_error() {
    let db = bootstrapped_db().await;
    let m = MigrationFile {
        version: 2,
        name: "Gone".to_string(),
        path: PathBuf::from("/nonexistent/v2-Gone.sql"),
    };

    let err = applier().apply(&m, &db).await.unwrap_err();
    assert!(matches!(err, MigrateError::ReadMigration { version: 2, .. }));
}

#[tokio::test]
async fn test_already_recorded_version_is_conflict() {
    let dir = TempDir::new().unwrap();
    let db = bootstrapped_db().await;
    let first = migration(&dir, 1, "Initial", "CREATE TABLE a (id INT)");
    applier().apply(&first, &db).await.unwrap();

    // Same version again, as a second concurrent runner would attempt.
    let again = migration(&dir, 1, "Again", "CREATE TABLE b (id INT)");
    let err = applier().apply(&again, &db).await.unwrap_err();
    assert!(matches!(err, MigrateError::VersionConflict { version: 1, .. }), "got {err}");
    assert!(!db.relation_exists("b").await.unwrap());
}

#[tokio::test]
async fn test_missing_version_table_is_record_error() {
    let dir = TempDir::new().unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let m = migration(&dir, 1, "Initial", "CREATE TABLE a (id INT)");

    let err = applier().apply(&m, &db).await.unwrap_err();
    assert!(matches!(err, MigrateError::RecordCommit { .. }), "got {err}");
    assert!(!db.relation_exists("a").await.unwrap());
}

#[tokio::test]
async fn test_parser_splitter_handles_semicolons_in_literals() {
    let dir = TempDir::new().unwrap();
    let db = bootstrapped_db().await;
    let m = migration(
        &dir,
        1,
        "Literals",
        "CREATE TABLE notes (body VARCHAR); INSERT INTO notes VALUES ('a;b');",
    );

    MigrationApplier::new("db_versions", StatementSplitter::Parser)
        .apply(&m, &db)
        .await
        .unwrap();
    assert_eq!(
        db.query_count("SELECT * FROM notes WHERE body = 'a;b'")
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_parser_splitter_error_opens_no_transaction() {
    let dir = TempDir::new().unwrap();
    let db = bootstrapped_db().await;
    let m = migration(&dir, 1, "Garbage", "CREATE TABLE (");

    let err = MigrationApplier::new("db_versions", StatementSplitter::Parser)
        .apply(&m, &db)
        .await
        .unwrap_err();
    assert!(matches!(err, MigrateError::StatementSplit { .. }), "got {err}");
    assert!(db.commit().await.is_err());
}
