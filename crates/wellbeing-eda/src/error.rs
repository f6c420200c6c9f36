//! Custom error types for the wellbeing analysis pipeline.
//!
//! This module provides the error hierarchy using `thiserror`.
//! Structural failures (an unreadable input file, a column with nothing to
//! impute from) are errors; data-quality findings are never errors and only
//! show up in the report.
//!
//! Errors are serializable so the JSON report and the CLI can expose a
//! stable `code` next to the human-readable message.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The input file is missing, unreadable, or structurally unparsable.
    #[error("Failed to load '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// A numeric column has missing entries but no value to derive a median from.
    #[error("Failed to impute missing values in column '{column}': {reason}")]
    ImputationFailed { column: String, reason: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// The chart surface rejected a payload.
    #[error("Failed to render chart: {0}")]
    ChartRenderFailed(String),

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
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Build a load error for `path`.
    pub fn load(path: impl Into<String>, reason: impl ToString) -> Self {
        EdaError::LoadFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoadFailed { .. } => "LOAD_ERROR",
            Self::ImputationFailed { .. } => "IMPUTATION_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::ChartRenderFailed(_) => "CHART_RENDER_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error aborts the pipeline before any analysis output exists.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::LoadFailed { .. } | Self::ImputationFailed { .. } | Self::InvalidConfig(_) => {
                true
            }
            Self::WithContext { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}

impl From<ConfigValidationError> for EdaError {
    fn from(err: ConfigValidationError) -> Self {
        EdaError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, EdaError>;

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
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}
