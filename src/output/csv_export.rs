//! CSV exporter
//!
//! Streams a [`ResultCursor`] into a CSV file: one header line with the
//! column names, then one line per record in cursor order.

use crate::error::{Error, Result};
use crate::output::cursor::ResultCursor;
use crate::types::{CellValue, ColumnList};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Configuration for the CSV writer
#[derive(Debug, Clone)]
pub struct CsvWriterConfig {
    delimiter: u8,
    header: bool,
    crlf: bool,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header: true,
            crlf: false,
        }
    }
}

impl CsvWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable the header line
    #[must_use]
    pub fn with_header(mut self, enabled: bool) -> Self {
        self.header = enabled;
        self
    }

    /// Terminate records with `\r\n` instead of `\n`
    #[must_use]
    pub fn crlf(mut self) -> Self {
        self.crlf = true;
        self
    }

    /// Get the field delimiter
    #[must_use]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Whether the header line is written
    #[must_use]
    pub fn has_header(&self) -> bool {
        self.header
    }

    fn build_writer<W: Write>(&self, wtr: W) -> csv::Writer<W> {
        let terminator = if self.crlf {
            Terminator::CRLF
        } else {
            Terminator::Any(b'\n')
        };
        WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(terminator)
            .from_writer(wtr)
    }
}

/// Outcome of a successful export
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// File that was written
    pub path: PathBuf,
    /// Header columns, in output order
    pub columns: ColumnList,
    /// Number of data lines (header excluded)
    pub rows: usize,
}

/// Writes result cursors to CSV files
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: CsvWriterConfig,
}

impl CsvExporter {
    /// Create an exporter with the given writer settings
    pub fn new(config: CsvWriterConfig) -> Self {
        Self { config }
    }

    /// Export every remaining record of `cursor` to `path`
    ///
    /// The file is created or truncated. Columns are read before the file is
    /// touched, so a schema failure leaves `path` as it was. Once the file is
    /// open it is flushed on every exit path and closed when this returns; a
    /// failure part way through leaves the rows written so far in place.
    pub fn export<C>(&self, cursor: &mut C, path: impl AsRef<Path>) -> Result<ExportSummary>
    where
        C: ResultCursor + ?Sized,
    {
        let path = path.as_ref();
        let columns = cursor.columns().map_err(as_schema_error)?;

        let file = File::create(path).map_err(|source| Error::SinkUnavailable {
            path: path.display().to_string(),
            source,
        })?;
        let mut writer = self.config.build_writer(file);

        let streamed = self.write_all(&mut writer, cursor, &columns);
        // Flush even when streaming failed; the streaming error wins
        let flushed = writer.flush().map_err(|e| Error::write("output file", e));
        let rows = streamed?;
        flushed?;

        Ok(ExportSummary {
            path: path.to_path_buf(),
            columns,
            rows,
        })
    }

    fn write_all<W, C>(
        &self,
        writer: &mut csv::Writer<W>,
        cursor: &mut C,
        columns: &[String],
    ) -> Result<usize>
    where
        W: Write,
        C: ResultCursor + ?Sized,
    {
        if self.config.header {
            writer
                .write_record(columns)
                .map_err(|e| Error::write("headers", e))?;
        }

        let mut rows = 0usize;
        loop {
            let row = rows + 1;
            let Some(record) = cursor
                .next_record()
                .map_err(|e| as_row_decode_error(row, e))?
            else {
                break;
            };
            if record.len() != columns.len() {
                return Err(Error::row_decode(
                    row,
                    format!(
                        "expected {} values, got {}",
                        columns.len(),
                        record.len()
                    ),
                ));
            }
            writer
                .write_record(record.iter().map(CellValue::to_field))
                .map_err(|e| Error::write(format!("row {row}"), e))?;
            rows = row;
        }

        Ok(rows)
    }
}

/// Column discovery reports `SchemaUnavailable` whatever the cursor returned
fn as_schema_error(err: Error) -> Error {
    match err {
        Error::SchemaUnavailable { .. } => err,
        other => Error::schema(other.to_string()),
    }
}

/// Fetching row `row` reports `RowDecodeFailure` whatever the cursor returned
fn as_row_decode_error(row: usize, err: Error) -> Error {
    match err {
        Error::RowDecodeFailure { .. } => err,
        other => Error::row_decode(row, other.to_string()),
    }
}

/// Export a cursor to `path` with default settings
pub fn export_to_csv<C>(cursor: &mut C, path: impl AsRef<Path>) -> Result<ExportSummary>
where
    C: ResultCursor + ?Sized,
{
    CsvExporter::default().export(cursor, path)
}
