//! Error types for collection, feature preparation, charting and reporting.
//!
//! Every fallible operation in this crate returns [`Result`]. Failures that
//! the callers treat as "skip this unit of work" (one season, one chart) are
//! ordinary variants here; the skipping policy lives with the caller.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the processing crate.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The season page answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    /// The request could not be completed (connect, timeout, body read).
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The statistics table is absent from the fetched document.
    #[error("Table '#{table_id}' not found in {url}")]
    TableNotFound { table_id: String, url: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A parsed table had a header but no usable rows.
    #[error("Table for season {0} contains no player rows")]
    EmptyTable(u16),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No row has a numeric value for the chart's metric.
    #[error("No numeric values for {metric} in chart '{title}'")]
    NoRankableValues { title: String, metric: String },

    /// Chart rendering failed.
    #[error("Failed to render chart '{title}': {reason}")]
    Plot { title: String, reason: String },

    /// PDF assembly failed.
    #[error("Failed to build report: {0}")]
    Report(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable code for the error kind, preserved through context wrapping.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HttpStatus { .. } => "HTTP_STATUS",
            Self::Http(_) => "HTTP_REQUEST_ERROR",
            Self::TableNotFound { .. } => "TABLE_NOT_FOUND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::EmptyTable(_) => "EMPTY_TABLE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoRankableValues { .. } => "NO_RANKABLE_VALUES",
            Self::Plot { .. } => "PLOT_FAILED",
            Self::Report(_) => "REPORT_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// True for failures caused by the remote page rather than local state.
    pub fn is_remote(&self) -> bool {
        match self {
            Self::HttpStatus { .. } | Self::Http(_) | Self::TableNotFound { .. } => true,
            Self::WithContext { source, .. } => source.is_remote(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields so
/// they can be embedded in run summaries.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ProcessingError::ColumnNotFound("PTS".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            ProcessingError::TableNotFound {
                table_id: "totals_stats".to_string(),
                url: "http://localhost".to_string(),
            }
            .error_code(),
            "TABLE_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_remote() {
        let status = ProcessingError::HttpStatus {
            status: 404,
            url: "http://localhost".to_string(),
        };
        assert!(status.is_remote());
        assert!(status.with_context("season 2031").is_remote());
        assert!(!ProcessingError::EmptyTable(2024).is_remote());
    }

    #[test]
    fn test_error_serialization() {
        let error = ProcessingError::ColumnNotFound("MP".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("MP"));
    }

    #[test]
    fn test_with_context() {
        let error = ProcessingError::ColumnNotFound("G".to_string()).with_context("Preparing features");
        assert!(error.to_string().contains("Preparing features"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
