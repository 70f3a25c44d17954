//! Error types for warehouse-bench
//!
//! Every public API returns `Result<T, Error>` where Error is defined here.
//! The export variants identify the phase that failed so callers can tell a
//! schema problem from a disk problem from a driver problem.

use thiserror::Error;

/// The main error type for warehouse-bench
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Export Errors
    // ============================================================================
    #[error("Failed to get column names: {message}")]
    SchemaUnavailable { message: String },

    #[error("Failed to create file {path}: {source}")]
    SinkUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {target}: {message}")]
    WriteFailure { target: String, message: String },

    #[error("Couldn't scan row {row}: {message}")]
    RowDecodeFailure { row: usize, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Database Errors
    // ============================================================================
    #[error("Failed to execute query: {message}")]
    Query { message: String },

    #[error("Connection check failed: {message}")]
    ConnectionCheck { message: String },

    // ============================================================================
    // Object Storage Errors
    // ============================================================================
    #[error("Failed to upload: {message}")]
    Upload { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a schema discovery error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaUnavailable {
            message: message.into(),
        }
    }

    /// Create a write error for the given target (header, row N, flush)
    pub fn write(target: impl Into<String>, message: impl ToString) -> Self {
        Self::WriteFailure {
            target: target.into(),
            message: message.to_string(),
        }
    }

    /// Create a row decode error; `row` is 1-based and excludes the header
    pub fn row_decode(row: usize, message: impl Into<String>) -> Self {
        Self::RowDecodeFailure {
            row,
            message: message.into(),
        }
    }

    /// Create a query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a connection check error
    pub fn connection_check(message: impl Into<String>) -> Self {
        Self::ConnectionCheck {
            message: message.into(),
        }
    }

    /// Create an upload error
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    /// Whether the error came out of the export pipeline
    pub fn is_export_failure(&self) -> bool {
        matches!(
            self,
            Error::SchemaUnavailable { .. }
                | Error::SinkUnavailable { .. }
                | Error::WriteFailure { .. }
                | Error::RowDecodeFailure { .. }
        )
    }
}

/// Result type alias for warehouse-bench
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("query");
        assert_eq!(err.to_string(), "Missing required config field: query");

        let err = Error::write("headers", "disk full");
        assert_eq!(err.to_string(), "Failed to write headers: disk full");

        let err = Error::row_decode(3, "bad utf-8");
        assert_eq!(err.to_string(), "Couldn't scan row 3: bad utf-8");
    }

    #[test]
    fn test_sink_unavailable_keeps_source() {
        let err = Error::SinkUnavailable {
            path: "/nope/out.csv".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("Failed to create file /nope/out.csv"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_export_failure() {
        assert!(Error::schema("gone").is_export_failure());
        assert!(Error::write("row 1", "boom").is_export_failure());
        assert!(Error::row_decode(1, "boom").is_export_failure());
        assert!(!Error::query("syntax").is_export_failure());
        assert!(!Error::upload("denied").is_export_failure());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
