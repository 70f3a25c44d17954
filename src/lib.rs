//! # warehouse-bench
//!
//! Benchmarks a warehouse export: run a query, stream the result set into a
//! CSV file with a header row, upload the file to object storage, and time
//! each phase.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use warehouse_bench::{run_benchmark, BenchConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut config = BenchConfig::from_env()?;
//!     config.query = Some("SELECT * FROM source_db.public.nation".into());
//!     config.destination = Some("s3://bench-results/runs".into());
//!
//!     let report = run_benchmark(&config, false).await?;
//!     println!("{} rows in {:.1} ms", report.rows, report.total_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Runner (cli)                           │
//! │  config → connect → query/export → upload → report              │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────────────┬──────────────────┐
//! │   Database   │            Output             │      Bench       │
//! ├──────────────┼───────────────────────────────┼──────────────────┤
//! │ DuckDB       │ ResultCursor → CSV exporter   │ PhaseTimer       │
//! │ ATTACH pg,   │ CloudDestination (S3, R2,     │ BenchReport      │
//! │ mysql, sqlite│ GCS, Azure, local)            │                  │
//! └──────────────┴───────────────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Cell values and records
pub mod types;

/// Configuration from YAML, environment and `.env`
pub mod config;

/// CSV export and object storage upload
pub mod output;

/// Database connector support via DuckDB
pub mod database;

/// Phase timing and reporting
pub mod bench;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use bench::{run_benchmark, BenchReport, PhaseTimer};
pub use config::BenchConfig;
pub use error::{Error, Result};
pub use output::{export_to_csv, CsvExporter, ResultCursor};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
