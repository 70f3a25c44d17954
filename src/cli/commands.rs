//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Warehouse export benchmark
#[derive(Parser, Debug)]
#[command(name = "warehouse-bench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Environment file loaded before reading variables (default: .env if present)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the database connection and print a few sample rows
    Check {
        /// Query used for the sample (default: the configured query)
        #[arg(long)]
        sample_query: Option<String>,

        /// Number of sample rows to print
        #[arg(long, default_value = "3")]
        sample_rows: usize,
    },

    /// Run the query, export the result to CSV and upload it
    Run {
        /// Query to execute (overrides config)
        #[arg(short, long)]
        query: Option<String>,

        /// Local CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Upload destination
        /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
        #[arg(short, long)]
        destination: Option<String>,

        /// Object key for the uploaded file
        #[arg(short, long)]
        key: Option<String>,

        /// Only export, do not upload
        #[arg(long)]
        skip_upload: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
