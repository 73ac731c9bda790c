use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, cleaning or shaping the churn dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("line {line}: invalid churn label '{value}' (expected 'Yes' or 'No')")]
    InvalidLabel { line: u64, value: String },
    #[error("line {line}: column '{column}' holds non-numeric value '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
    #[error("dataset has no usable rows")]
    Empty,
    #[error("invalid split: {0}")]
    InvalidSplit(String),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Errors raised when a categorical value cannot be turned into a code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("no encoder table for column '{0}'")]
    UnknownColumn(String),
    #[error("value '{value}' was never seen in column '{column}' at training time")]
    UnseenCategory { column: String, value: String },
    #[error("field '{field}' got '{value}', expected one of {expected}")]
    OutOfDomain {
        field: String,
        value: String,
        expected: &'static str,
    },
}
