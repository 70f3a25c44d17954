//! Integration tests using a DuckDB file as the source database
//!
//! Tests the full end-to-end flow: config → DuckDB ATTACH → CSV export → local upload

use clap::Parser;
use pretty_assertions::assert_eq;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use warehouse_bench::cli::{Cli, Runner};
use warehouse_bench::config::{BenchConfig, DatabaseConfig, DatabaseConnectionDef, DatabaseKind};
use warehouse_bench::database::DatabaseEngine;
use warehouse_bench::{export_to_csv, run_benchmark, Error};

/// Create a DuckDB database file with a small TPC-H style `nation` table
fn create_source_db(dir: &Path) -> PathBuf {
    let path = dir.join("source.duckdb");
    let conn = duckdb::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE nation (
            n_nationkey INTEGER,
            n_name VARCHAR,
            n_regionkey INTEGER,
            n_comment VARCHAR
        );
        INSERT INTO nation VALUES
            (0, 'ALGERIA', 0, 'haggle. carefully final deposits'),
            (1, 'ARGENTINA', 1, NULL),
            (2, 'BRAZIL', 1, 'y alongside of the pending, \"special\" deposits'),
            (3, 'CANADA', 1, 'line one\nline two');",
    )
    .unwrap();
    path
}

fn duckdb_config(db_path: &Path) -> DatabaseConfig {
    DatabaseConfig {
        kind: DatabaseKind::Duckdb,
        connection: DatabaseConnectionDef {
            database: Some(db_path.to_string_lossy().into_owned()),
            ..DatabaseConnectionDef::default()
        },
    }
}

fn setup() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_source_db(dir.path());
    (dir, db_path)
}

// ============================================================================
// Export Tests
// ============================================================================

#[test]
fn test_export_attached_table() {
    let (dir, db_path) = setup();
    let engine = DatabaseEngine::new(DatabaseKind::Duckdb, &duckdb_config(&db_path).connection)
        .unwrap();
    let out = dir.path().join("nation.csv");

    let summary = engine
        .with_cursor(
            "SELECT * FROM source_db.main.nation ORDER BY n_nationkey",
            |cursor| export_to_csv(cursor, &out),
        )
        .unwrap();

    assert_eq!(summary.rows, 4);
    assert_eq!(
        summary.columns,
        vec!["n_nationkey", "n_name", "n_regionkey", "n_comment"]
    );

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, summary.columns);

    let rows: Vec<Vec<String>> = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1], vec!["1", "ARGENTINA", "1", ""]);
    assert_eq!(rows[2][3], "y alongside of the pending, \"special\" deposits");
    assert_eq!(rows[3][3], "line one\nline two");
}

#[test]
fn test_export_empty_result_has_header() {
    let (dir, db_path) = setup();
    let engine = DatabaseEngine::new(DatabaseKind::Duckdb, &duckdb_config(&db_path).connection)
        .unwrap();
    let out = dir.path().join("empty.csv");

    let summary = engine
        .with_cursor(
            "SELECT n_nationkey, n_name FROM source_db.main.nation WHERE n_regionkey = 99",
            |cursor| export_to_csv(cursor, &out),
        )
        .unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "n_nationkey,n_name\n");
}

#[test]
fn test_export_typed_and_nested_values() {
    let dir = tempfile::tempdir().unwrap();
    let engine = DatabaseEngine::in_memory().unwrap();
    let out = dir.path().join("typed.csv");

    engine
        .with_cursor(
            "SELECT
                [1, 2, NULL] AS list_col,
                {'a': 1, 'b': 'x'} AS struct_col,
                'hi'::BLOB AS blob_col,
                TIME '12:30:00' AS time_col,
                '12345678901234567890'::HUGEINT AS huge_col",
            |cursor| export_to_csv(cursor, &out),
        )
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "list_col,struct_col,blob_col,time_col,huge_col\n\
         \"[1, 2, NULL]\",\"{a: 1, b: x}\",aGk=,12:30:00,12345678901234567890\n"
    );
}

#[test]
fn test_export_into_missing_directory_fails() {
    let (dir, db_path) = setup();
    let engine = DatabaseEngine::new(DatabaseKind::Duckdb, &duckdb_config(&db_path).connection)
        .unwrap();
    let out = dir.path().join("no").join("such").join("dir.csv");

    let err = engine
        .with_cursor("SELECT * FROM source_db.main.nation", |cursor| {
            export_to_csv(cursor, &out)
        })
        .unwrap_err();

    assert!(matches!(err, Error::SinkUnavailable { .. }), "got {err:?}");
    assert!(err.is_export_failure());
}

#[test]
fn test_source_is_read_only() {
    let (_dir, db_path) = setup();
    let engine = DatabaseEngine::new(DatabaseKind::Duckdb, &duckdb_config(&db_path).connection)
        .unwrap();

    let err = engine
        .execute_batch("DELETE FROM source_db.main.nation")
        .unwrap_err();
    assert!(matches!(err, Error::Query { .. }));
}

// ============================================================================
// Benchmark Tests
// ============================================================================

#[tokio::test]
async fn test_benchmark_uploads_to_local_destination() {
    let (dir, db_path) = setup();
    let uploads = dir.path().join("uploads");
    let config = BenchConfig {
        database: duckdb_config(&db_path),
        query: Some("SELECT n_nationkey, n_name FROM source_db.main.nation ORDER BY 1".to_string()),
        output: dir.path().join("nation.csv"),
        destination: Some(uploads.to_string_lossy().into_owned()),
        ..BenchConfig::default()
    };

    let report = run_benchmark(&config, false).await.unwrap();

    assert_eq!(report.rows, 4);
    assert_eq!(
        report.phases.iter().map(|p| p.phase.as_str()).collect::<Vec<_>>(),
        vec!["connect", "query_export", "upload"]
    );
    assert!(report.phases.iter().all(|p| p.succeeded));
    assert!(report.total_ms >= report.phases[1].duration_ms);

    // Default key is partitioned by the output file stem
    let location = report.uploaded_to.unwrap();
    assert!(location.contains("nation/dt="), "got {location}");
    assert!(location.ends_with("/data.csv"));

    let key = config.upload_key();
    assert_eq!(
        std::fs::read(uploads.join(&key)).unwrap(),
        std::fs::read(dir.path().join("nation.csv")).unwrap()
    );
}

#[tokio::test]
async fn test_benchmark_query_error_stops_before_upload() {
    let (dir, db_path) = setup();
    let uploads = dir.path().join("uploads");
    let config = BenchConfig {
        database: duckdb_config(&db_path),
        query: Some("SELECT * FROM source_db.main.missing_table".to_string()),
        output: dir.path().join("out.csv"),
        destination: Some(uploads.to_string_lossy().into_owned()),
        key: Some("out.csv".to_string()),
        ..BenchConfig::default()
    };

    let err = run_benchmark(&config, false).await.unwrap_err();

    assert!(matches!(err, Error::Query { .. }), "got {err:?}");
    assert!(!dir.path().join("out.csv").exists());
    assert!(!uploads.join("out.csv").exists());
}

// ============================================================================
// CLI Tests
// ============================================================================

#[tokio::test]
async fn test_cli_run_with_yaml_config() {
    let (dir, db_path) = setup();
    let output = dir.path().join("cli.csv");
    let config_path = dir.path().join("bench.yaml");
    std::fs::write(
        &config_path,
        format!(
            "database:\n  kind: duckdb\n  connection:\n    database: {}\nquery: SELECT n_name FROM source_db.main.nation WHERE n_regionkey = 1 ORDER BY n_name\n",
            db_path.display()
        ),
    )
    .unwrap();
    let env_path = dir.path().join("bench.env");
    std::fs::write(&env_path, "").unwrap();

    let args: Vec<OsString> = vec![
        "warehouse-bench".into(),
        "--config".into(),
        config_path.into_os_string(),
        "--env-file".into(),
        env_path.into_os_string(),
        "run".into(),
        "--output".into(),
        output.clone().into_os_string(),
        "--skip-upload".into(),
    ];
    let cli = Cli::try_parse_from(args).unwrap();

    Runner::new(cli).run().await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "n_name\nARGENTINA\nBRAZIL\nCANADA\n"
    );
}

#[tokio::test]
async fn test_cli_check_with_sample_query() {
    let (dir, db_path) = setup();
    let config_path = dir.path().join("bench.yaml");
    std::fs::write(
        &config_path,
        format!(
            "database:\n  kind: duckdb\n  connection:\n    database: {}\n",
            db_path.display()
        ),
    )
    .unwrap();
    let env_path = dir.path().join("bench.env");
    std::fs::write(&env_path, "").unwrap();

    let args: Vec<OsString> = vec![
        "warehouse-bench".into(),
        "--config".into(),
        config_path.into_os_string(),
        "--env-file".into(),
        env_path.into_os_string(),
        "check".into(),
        "--sample-query".into(),
        "SELECT * FROM source_db.main.nation".into(),
    ];
    let cli = Cli::try_parse_from(args).unwrap();

    Runner::new(cli).run().await.unwrap();
}
