//! Error types for the CSV processing pipeline.
//!
//! Every failure is a [`ProcessingError`]. Variants fall into the broad
//! categories described by [`ErrorKind`] so that callers (the CLI, or a UI
//! layer) can decide how to present them:
//!
//! - **Input** errors reject an upload before any table exists.
//! - **Validation** errors reject a request before any operation runs.
//! - **Computation** errors abort a processing step that cannot be performed.
//!
//! Errors are serializable as `{ "code": ..., "message": ... }` so they can be
//! emitted in the CLI's JSON report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// Broad category of a [`ProcessingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The uploaded bytes could not be turned into a table.
    Input,
    /// The request does not match the current table or is malformed.
    Validation,
    /// An operation cannot be computed on the selected data.
    Computation,
    /// Unexpected failure in a dependency.
    Internal,
}

/// The main error type for the processing pipeline.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The uploaded stream contained no data.
    #[error("The uploaded file is empty")]
    EmptyInput,

    /// The parsed table has no columns.
    #[error("The file must contain at least one column")]
    NoColumns,

    /// The stream is not valid CSV.
    #[error("Invalid CSV format: {0}")]
    MalformedCsv(String),

    /// A selected column is not part of the current table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No non-missing values exist to compute a statistic from.
    #[error("Cannot {operation} column '{column}': it has no non-missing values")]
    NoValidValues { column: String, operation: String },

    /// No table has been loaded into the session yet.
    #[error("No data loaded")]
    NoDataLoaded,

    /// The session has no processed table yet.
    #[error("No processed data available; run processing first")]
    NoProcessedData,

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

    /// Shorthand for [`ProcessingError::NoValidValues`].
    pub fn no_valid_values(column: impl Into<String>, operation: impl Into<String>) -> Self {
        ProcessingError::NoValidValues {
            column: column.into(),
            operation: operation.into(),
        }
    }

    /// Get a stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EMPTY_INPUT",
            Self::NoColumns => "NO_COLUMNS",
            Self::MalformedCsv(_) => "MALFORMED_CSV",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoValidValues { .. } => "NO_VALID_VALUES",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::NoProcessedData => "NO_PROCESSED_DATA",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput | Self::NoColumns | Self::MalformedCsv(_) => ErrorKind::Input,
            Self::ColumnNotFound(_)
            | Self::InvalidConfig(_)
            | Self::NoDataLoaded
            | Self::NoProcessedData => ErrorKind::Validation,
            Self::NoValidValues { .. } => ErrorKind::Computation,
            Self::Io(_) | Self::Polars(_) | Self::Json(_) => ErrorKind::Internal,
            Self::WithContext { source, .. } => source.kind(),
        }
    }

    /// Check if this error was caused by the user's input rather than a fault.
    ///
    /// Recoverable errors leave session state untouched; the user can fix the
    /// upload or selection and try again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Internal)
    }
}

/// Errors are serialized as a struct with `code`, `kind` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 3)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("kind", &self.kind())?;
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
