use crate::api::error::ApiError;
use crate::reshape::error::ReshapeError;
use crate::types::error::ModelError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaterspyError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Reshape(#[from] ReshapeError),

    #[error("Failed processing DataFrame")]
    DataFrame(#[from] polars::error::PolarsError),

    #[error("Failed to determine configuration directory")]
    ConfigDirResolution,

    #[error("Failed to read configuration file '{0}'")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse configuration file '{0}'")]
    ConfigParse(PathBuf, #[source] serde_json::Error),
}
