//! Errors
//!
//! Custom error types used throughout the `carboncast` crate. Every step of
//! the training and scoring paths (load, validate, transform, fit, predict)
//! reports its own error kind instead of funneling through one catch-all.
use thiserror::Error;

/// Errors that can occur while training or serving the carbon model.
#[derive(Debug, Error)]
pub enum CarbonError {
    /// Unable to read a dataset, record, or model file.
    #[error("Unable to read {0}")]
    UnableToRead(String),
    /// Unable to write a model or chart to file.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// The dataset is missing the target column.
    #[error("Target column '{0}' not found in the dataset.")]
    MissingTarget(String),
    /// One or more expected feature columns are absent.
    #[error("Missing expected columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    /// The dataset contains no rows.
    #[error("The dataset contains no rows.")]
    EmptyDataset,
    /// A value could not be interpreted for the column it belongs to.
    #[error("Invalid value {0} passed for {1}, expected {2}.")]
    ParseValue(String, String, String),
    /// A malformed row in the input CSV.
    #[error("Row {0}: {1}")]
    InvalidRow(usize, String),
    /// The scoring frame does not line up with the columns the pipeline was fit on.
    #[error("Input columns do not match the columns the model was trained on.")]
    ColumnMismatch,
}
