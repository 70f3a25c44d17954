//! CLI runner - executes commands

use crate::bench::{phase, run_benchmark, PhaseTimer};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_dotenv, BenchConfig};
use crate::database::DatabaseEngine;
use crate::error::{Result, ResultExt};
use serde_json::{json, Value};
use std::path::PathBuf;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check {
                sample_query,
                sample_rows,
            } => self.check(sample_query.as_deref(), *sample_rows),
            Commands::Run {
                query,
                output,
                destination,
                key,
                skip_upload,
            } => {
                let overrides = RunOverrides {
                    query: query.clone(),
                    output: output.clone(),
                    destination: destination.clone(),
                    key: key.clone(),
                };
                self.run_bench(overrides, *skip_upload).await
            }
        }
    }

    /// Load configuration: env file, then YAML file, then environment variables
    fn load_config(&self) -> Result<BenchConfig> {
        load_dotenv(self.cli.env_file.as_deref())?;

        let mut config = match &self.cli.config {
            Some(path) => BenchConfig::from_yaml_file(path)?,
            None => BenchConfig::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Check database connection
    fn check(&self, sample_query: Option<&str>, sample_rows: usize) -> Result<()> {
        let config = self.load_config()?;
        let kind = config.database.kind;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Checking connection to {kind} database")
            }
        }));

        let mut timer = PhaseTimer::new();
        let connected = timer.time(phase::CONNECT, || {
            let engine = DatabaseEngine::new(kind, &config.database.connection)?;
            engine.check_connection()?;
            Ok(engine)
        });

        let engine = match connected {
            Ok(engine) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "message": format!("Connected to {}", engine.connection_info()),
                        "duration_ms": timer.get(phase::CONNECT)
                    }
                }));
                engine
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection check failed: {e}")
                    }
                }));
                return Err(e);
            }
        };

        let query = match sample_query {
            Some(q) => q.to_string(),
            None => config.query()?.to_string(),
        };
        let (columns, rows) = engine
            .sample(&query, sample_rows)
            .context("Sample query failed")?;

        self.output_message(&json!({
            "type": "SAMPLE",
            "sample": {
                "query": query,
                "columns": columns,
                "rows": rows
            }
        }));

        Ok(())
    }

    /// Run the benchmark and print its report
    async fn run_bench(&self, overrides: RunOverrides, skip_upload: bool) -> Result<()> {
        let mut config = self.load_config()?;
        overrides.apply(&mut config);

        let report = run_benchmark(&config, skip_upload).await?;

        self.output_message(&json!({
            "type": "BENCH_REPORT",
            "report": report
        }));

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// `run` flags that take precedence over file and environment config
#[derive(Debug, Default)]
struct RunOverrides {
    query: Option<String>,
    output: Option<PathBuf>,
    destination: Option<String>,
    key: Option<String>,
}

impl RunOverrides {
    fn apply(self, config: &mut BenchConfig) {
        if let Some(query) = self.query {
            config.query = Some(query);
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(destination) = self.destination {
            config.destination = Some(destination);
        }
        if let Some(key) = self.key {
            config.key = Some(key);
        }
    }
}
