use polars::error::PolarsError;
use polars::prelude::DataType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReshapeError {
    #[error("Required column '{0}' not found in measurement table")]
    MissingColumn(String),

    #[error("Column '{column}' has no value in row {row}")]
    MissingValue { column: &'static str, row: usize },

    #[error("Unparsable timestamp '{value}' in row {row}")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Unsupported type {0} for column 'timestamp'")]
    UnsupportedTimestampType(DataType),

    #[error("Failed to read measurement table '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
