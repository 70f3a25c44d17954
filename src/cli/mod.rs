//! CLI module
//!
//! Command-line interface for running the benchmark.
//!
//! # Commands
//!
//! - `check` - Test the database connection and print sample rows
//! - `run` - Export the query result to CSV, upload it, report timings

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
