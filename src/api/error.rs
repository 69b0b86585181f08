use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Failed to parse JSON response")]
    JsonParse(#[from] serde_json::Error),

    #[error("Request to {url} failed: Status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Failed to read credentials from the prompt")]
    Prompt(#[source] std::io::Error),

    #[error("{0} method not implemented yet.")]
    MethodNotImplemented(&'static str),

    #[error("Timeseries data not found.")]
    TimeseriesNotFound,

    #[error("Response header '{0}' is missing")]
    MissingHeader(&'static str),

    #[error("Response header '{name}' has invalid value '{value}'")]
    InvalidHeader { name: &'static str, value: String },

    #[error("Could not parse timestamp '{0}'")]
    InvalidTimestamp(String),
}
