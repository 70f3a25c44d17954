//! Phase timing and the benchmark report
//!
//! [`run_benchmark`] is the whole benchmark: connect, stream the query result
//! into a CSV file, upload the file, timing each phase.

use crate::config::BenchConfig;
use crate::database::DatabaseEngine;
use crate::error::{Error, Result};
use crate::output::{CloudDestination, CsvExporter, CsvWriterConfig};
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};

/// Phase names used by the runner
pub mod phase {
    pub const CONNECT: &str = "connect";
    pub const QUERY_EXPORT: &str = "query_export";
    pub const UPLOAD: &str = "upload";
}

/// Wall-clock duration of one phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseTiming {
    pub phase: String,
    pub duration_ms: f64,
    pub succeeded: bool,
}

/// Records named phases in the order they run
#[derive(Debug, Default)]
pub struct PhaseTimer {
    phases: Vec<PhaseTiming>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time a synchronous phase
    ///
    /// The duration is recorded whether `f` succeeds or fails.
    pub fn time<T, F>(&mut self, name: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let start = Instant::now();
        let result = f();
        self.record(name, start.elapsed(), result.is_ok());
        result
    }

    /// Time an asynchronous phase
    pub async fn time_async<T, Fut>(&mut self, name: &str, fut: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let start = Instant::now();
        let result = fut.await;
        self.record(name, start.elapsed(), result.is_ok());
        result
    }

    /// Record an externally measured phase
    pub fn record(&mut self, name: &str, elapsed: Duration, succeeded: bool) {
        let duration_ms = elapsed.as_nanos() as f64 / 1_000_000.0;
        if succeeded {
            tracing::info!(phase = name, duration_ms, "Phase completed");
        } else {
            tracing::warn!(phase = name, duration_ms, "Phase failed");
        }
        self.phases.push(PhaseTiming {
            phase: name.to_string(),
            duration_ms,
            succeeded,
        });
    }

    pub fn phases(&self) -> &[PhaseTiming] {
        &self.phases
    }

    /// Duration of a recorded phase, if it ran
    pub fn get(&self, name: &str) -> Option<f64> {
        self.phases
            .iter()
            .find(|p| p.phase == name)
            .map(|p| p.duration_ms)
    }

    /// Sum of all recorded phases in milliseconds
    pub fn total_ms(&self) -> f64 {
        self.phases.iter().map(|p| p.duration_ms).sum()
    }
}

/// Summary printed at the end of `run`
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub query: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_to: Option<String>,
    pub phases: Vec<PhaseTiming>,
    pub total_ms: f64,
}

impl BenchReport {
    pub fn new(query: impl Into<String>, timer: &PhaseTimer) -> Self {
        Self {
            query: query.into(),
            rows: 0,
            columns: Vec::new(),
            output: String::new(),
            uploaded_to: None,
            phases: timer.phases().to_vec(),
            total_ms: timer.total_ms(),
        }
    }
}

/// Resolve the upload destination from config
///
/// A destination URL wins over a bare bucket name.
pub fn resolve_destination(config: &BenchConfig) -> Result<CloudDestination> {
    if let Some(url) = config.destination.as_deref() {
        return CloudDestination::parse(url);
    }
    if let Some(bucket) = config.bucket.as_deref() {
        return CloudDestination::s3(bucket, config.region.as_deref());
    }
    Err(Error::config(
        "No upload destination: set destination or bucket, or skip the upload",
    ))
}

/// Run the benchmark described by `config`
///
/// Fails on the first phase that fails; the CSV file written so far is left
/// in place.
pub async fn run_benchmark(config: &BenchConfig, skip_upload: bool) -> Result<BenchReport> {
    let query = config.query()?.to_string();
    let destination = if skip_upload {
        None
    } else {
        Some(resolve_destination(config)?)
    };

    let mut timer = PhaseTimer::new();

    let engine = timer.time(phase::CONNECT, || {
        let engine = DatabaseEngine::new(config.database.kind, &config.database.connection)?;
        engine.check_connection()?;
        Ok(engine)
    })?;
    tracing::info!("Connected to {}", engine.connection_info());

    let exporter = CsvExporter::new(CsvWriterConfig::default());
    let summary = timer.time(phase::QUERY_EXPORT, || {
        engine.with_cursor(&query, |cursor| exporter.export(cursor, &config.output))
    })?;
    tracing::info!(
        rows = summary.rows,
        "Exported {} columns to {}",
        summary.columns.len(),
        summary.path.display()
    );

    let uploaded_to = match destination {
        Some(destination) => {
            let key = config.upload_key();
            let location = timer
                .time_async(phase::UPLOAD, destination.upload_file(&summary.path, &key))
                .await?;
            Some(location)
        }
        None => {
            tracing::info!("Upload skipped");
            None
        }
    };

    let mut report = BenchReport::new(query, &timer);
    report.rows = summary.rows;
    report.columns = summary.columns;
    report.output = summary.path.display().to_string();
    report.uploaded_to = uploaded_to;
    Ok(report)
}
