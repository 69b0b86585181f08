use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid target specified: '{0}'")]
    InvalidOptionTarget(String),

    #[error("Invalid list target: '{0}'")]
    InvalidListTarget(String),

    #[error("Invalid value for 'what': '{0}'. Must be 'parameters' or 'analytes'")]
    InvalidSampleKind(String),

    #[error("Invalid sample type: '{0}'. Must be 'groundwater', 'wastewater' or 'surfacewater'")]
    InvalidSampleType(String),

    #[error("At least station has to be provided. For logger records, a station, logger or combination of both can be provided.")]
    MissingStationOrLogger,

    #[error("Period bound is not a valid timestamp")]
    InvalidPeriodBound,

    #[error("No samples found for the given criteria.")]
    NoSamplesFound,

    #[error("Timeseries has {index} timestamps but {values} values")]
    LengthMismatch { index: usize, values: usize },

    #[error("Failed to build DataFrame")]
    Frame(#[from] polars::error::PolarsError),
}
