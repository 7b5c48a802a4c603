//! Error types for the rent panel pipeline.
//!
//! - [`CsvError`] - Reading, decoding and tabular parsing
//! - [`TransformError`] - Reshaping a wide table into a long panel
//! - [`PipelineError`] - Top-level orchestration (file in, file out)
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while turning raw bytes into a [`crate::models::WideTable`].
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Bytes could not be decoded into text.
    #[error("Failed to decode input: {0}")]
    EncodingError(String),

    /// Invalid delimited format (ragged rows, broken quoting).
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CsvError::IoError(io),
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => CsvError::ParseError {
                line,
                message: format!("expected {} fields, found {}", expected_len, len),
            },
            csv::ErrorKind::Utf8 { err, .. } => CsvError::EncodingError(err.to_string()),
            other => CsvError::ParseError {
                line,
                message: format!("{:?}", other),
            },
        }
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while reshaping a wide table.
///
/// Missing rents are never an error: they are resolved by forward-filling
/// or by dropping the geography.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Input is not a usable delimited table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Columns are missing or misplaced.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A date column header is not a calendar date.
    #[error("Cannot parse date column '{column}': {message}")]
    DateParse { column: String, message: String },
}

impl TransformError {
    pub fn schema(message: impl Into<String>) -> Self {
        TransformError::Schema(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        TransformError::MalformedInput(message.into())
    }
}

impl From<CsvError> for TransformError {
    fn from(err: CsvError) -> Self {
        TransformError::MalformedInput(err.to_string())
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::transform_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Writing the output failed.
    #[error("Output error: {0}")]
    Output(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Output(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::schema("missing column 'RegionName'");
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("RegionName"));
    }

    #[test]
    fn test_csv_error_becomes_malformed_input() {
        let err: TransformError = CsvError::NoHeaders.into();
        assert!(matches!(err, TransformError::MalformedInput(_)));
    }

    #[test]
    fn test_date_parse_error_format() {
        let err = TransformError::DateParse {
            column: "SizeRank".into(),
            message: "not a calendar date".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SizeRank"));
        assert!(msg.contains("not a calendar date"));
    }
}
