//! Database integration tests with real PostgreSQL
//!
//! These tests require a live PostgreSQL database.
//! Set POSTGRES_TEST_URL environment variable to run.

use warehouse_bench::config::{BenchConfig, DatabaseConfig, DatabaseConnectionDef, DatabaseKind};
use warehouse_bench::database::DatabaseEngine;
use warehouse_bench::{export_to_csv, run_benchmark};

/// Get test connection string from environment or skip
fn get_test_connection() -> Option<String> {
    std::env::var("POSTGRES_TEST_URL").ok()
}

fn connection(conn_str: String) -> DatabaseConnectionDef {
    DatabaseConnectionDef {
        connection_string: Some(conn_str),
        ..DatabaseConnectionDef::default()
    }
}

const SERIES_QUERY: &str = "SELECT * FROM postgres_query('source_db', \
     'SELECT g AS id, md5(g::text) AS name, NULLIF(g % 10, 0) AS bucket \
      FROM generate_series(1, 1000) g ORDER BY g')";

#[test]
fn test_postgres_connection() {
    let Some(conn_str) = get_test_connection() else {
        println!("Skipping: POSTGRES_TEST_URL not set");
        return;
    };

    let engine = DatabaseEngine::new(DatabaseKind::Postgres, &connection(conn_str));

    assert!(
        engine.is_ok(),
        "Failed to create engine: {:?}",
        engine.err()
    );

    let engine = engine.unwrap();
    let check = engine.check_connection();
    assert!(check.is_ok(), "Connection check failed: {:?}", check.err());
    assert!(!engine.connection_info().is_empty());

    println!("Connection check passed!");
}

#[test]
fn test_postgres_export_to_csv() {
    let Some(conn_str) = get_test_connection() else {
        println!("Skipping: POSTGRES_TEST_URL not set");
        return;
    };

    let engine = DatabaseEngine::new(DatabaseKind::Postgres, &connection(conn_str)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("series.csv");

    let summary = engine
        .with_cursor(SERIES_QUERY, |cursor| export_to_csv(cursor, &path))
        .unwrap();

    assert_eq!(summary.rows, 1000);
    assert_eq!(summary.columns, vec!["id", "name", "bucket"]);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1001);
    assert_eq!(lines[0], "id,name,bucket");
    assert!(lines[1].starts_with("1,"));
    // Every tenth row has a null bucket
    assert!(lines[10].ends_with(','));

    println!("Exported {} rows to {}", summary.rows, path.display());
}

#[tokio::test]
async fn test_postgres_benchmark_to_local_destination() {
    let Some(conn_str) = get_test_connection() else {
        println!("Skipping: POSTGRES_TEST_URL not set");
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let config = BenchConfig {
        database: DatabaseConfig {
            kind: DatabaseKind::Postgres,
            connection: connection(conn_str),
        },
        query: Some(SERIES_QUERY.to_string()),
        output: dir.path().join("series.csv"),
        destination: Some(uploads.to_string_lossy().into_owned()),
        key: Some("series.csv".to_string()),
        ..BenchConfig::default()
    };

    let report = run_benchmark(&config, false).await.unwrap();

    assert_eq!(report.rows, 1000);
    assert_eq!(report.phases.len(), 3);
    assert_eq!(
        std::fs::read(uploads.join("series.csv")).unwrap(),
        std::fs::read(dir.path().join("series.csv")).unwrap()
    );

    println!("{}", serde_json::to_string_pretty(&report).unwrap());
}
