//! Error types for dataset loading and filter evaluation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading datasets or evaluating filters against them.
#[derive(Debug, Error)]
pub enum DataError {
    /// Dataset file not found.
    #[error("dataset file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read dataset file.
    #[error("failed to read dataset {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV into a DataFrame.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// No dataset with this name has been loaded.
    #[error("dataset not loaded: {name}")]
    DatasetNotLoaded { name: String },

    /// A filter atom references a column the dataset does not have.
    #[error("column '{column}' not found in dataset {dataset}")]
    ColumnNotFound { column: String, dataset: String },

    /// A filter atom references a different dataset than the one being
    /// evaluated. The parser permits mixed-dataset filters; evaluation
    /// against a single tabular handle does not.
    #[error("filter references dataset {found}, expected {expected}")]
    DatasetMismatch { expected: String, found: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for DataError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
