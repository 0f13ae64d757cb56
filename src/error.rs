//! Error types for loading holdings and validating run parameters.

use thiserror::Error;

/// File-level failure while reading a holdings CSV. Nothing is analyzed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not open holdings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file appears to be empty or has no header")]
    MissingHeader,

    #[error("CSV file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Reason a single CSV row was skipped. The rest of the file is still read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("Malformed row - {0}.")]
    Malformed(String),

    #[error("Blank confirmation number.")]
    BlankConfirmation,

    #[error("Data conversion error - invalid {field} '{value}'.")]
    InvalidField { field: &'static str, value: String },

    #[error("Negative numeric value(s).")]
    NegativeValue,

    #[error("Future issue date.")]
    FutureIssueDate,

    #[error("Duplicate confirmation number.")]
    DuplicateConfirmation,
}

/// Rejected run parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("{name} must be a number, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} cannot be negative, got {value}")]
    NegativeRate { name: &'static str, value: f64 },

    #[error("Investment horizon must be a positive integer")]
    NonPositiveHorizon,
}
