//! # Error Types
//!
//! Structured error types for volt_core. These errors carry enough context
//! to be handled programmatically - a failed conductor table lookup reports
//! which table and which key missed, not just a message string.
//!
//! ## Example
//!
//! ```rust
//! use volt_core::errors::{EeError, EeResult};
//!
//! fn validate_length(length_ft: f64) -> EeResult<()> {
//!     if length_ft < 0.0 {
//!         return Err(EeError::invalid_input(
//!             "length_ft",
//!             length_ft.to_string(),
//!             "Conductor length cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for volt_core operations
pub type EeResult<T> = Result<T, EeError>;

/// Structured error type for toolkit operations.
///
/// Each variant provides specific context about what went wrong,
/// and serializes to tagged JSON for API consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EeError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Lookup against one of the embedded placeholder tables failed
    #[error("No entry in {table} table for '{key}'")]
    TableLookup { table: String, key: String },

    /// An analysis could not be completed
    #[error("Analysis failed: {analysis} - {reason}")]
    AnalysisFailed { analysis: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EeError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EeError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EeError::MissingField {
            field: field.into(),
        }
    }

    /// Create a TableLookup error
    pub fn table_lookup(table: impl Into<String>, key: impl Into<String>) -> Self {
        EeError::TableLookup {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an AnalysisFailed error
    pub fn analysis_failed(analysis: impl Into<String>, reason: impl Into<String>) -> Self {
        EeError::AnalysisFailed {
            analysis: analysis.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EeError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EeError::InvalidInput { .. } => "INVALID_INPUT",
            EeError::MissingField { .. } => "MISSING_FIELD",
            EeError::TableLookup { .. } => "TABLE_LOOKUP",
            EeError::AnalysisFailed { .. } => "ANALYSIS_FAILED",
            EeError::FileError { .. } => "FILE_ERROR",
            EeError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EeError::VersionMismatch { .. } => "VERSION_MISMATCH",
            EeError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
