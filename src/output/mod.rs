//! Output module
//!
//! Turns query results into files and ships them.
//!
//! # Overview
//!
//! This module provides:
//! - The [`ResultCursor`] abstraction over forward-only result sets
//! - Streaming a cursor into a CSV file with a header row
//! - Uploading files to object storage (S3, R2, GCS, Azure, local)

mod cloud;
mod csv_export;
mod cursor;

pub use cloud::{build_partitioned_path, CloudDestination};
pub use csv_export::{export_to_csv, CsvExporter, CsvWriterConfig, ExportSummary};
pub use cursor::{MemoryCursor, ResultCursor};
