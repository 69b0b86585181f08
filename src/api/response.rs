//! Wraps raw HTTP responses and classifies them by status code.

use crate::api::error::ApiError;
use crate::types::timeseries::TimeSeries;
use crate::utils::parse_timestamp;
use log::warn;
use reqwest::blocking::Response;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

const NO_CONTENT: &str = "No content found.";

/// What a response carries, classified by status code.
///
/// * `200` is [`Content::Success`] with the parsed JSON body.
/// * `204` and `404` are [`Content::Empty`]. Neither is treated as an error.
/// * Everything else is [`Content::Failure`] with the status and the raw body.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Success(Value),
    Empty,
    Failure { status: u16, body: String },
}

impl Content {
    pub fn is_success(&self) -> bool {
        matches!(self, Content::Success(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Content::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Content::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Success(value) => write!(f, "{value}"),
            Content::Empty => write!(f, "{NO_CONTENT}"),
            Content::Failure { status, body } => write!(f, "Status {status}: {body}"),
        }
    }
}

/// A fully read response from the API.
#[derive(Debug, Clone)]
pub struct WaterResponse {
    url: String,
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl WaterResponse {
    pub(crate) fn from_blocking(url: String, response: Response) -> Result<Self, ApiError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| ApiError::BodyRead(url.clone(), e))?
            .to_vec();
        Ok(Self {
            url,
            status,
            headers,
            body,
        })
    }

    /// Builds a response from its parts, without a network round trip.
    pub fn from_parts(status: u16, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: String::new(),
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Looks up a header case-insensitively. Values that are not visible
    /// ASCII are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn fail(&self) -> String {
        format!("Status {}: {}", self.status, self.text())
    }

    pub fn content(&self) -> Result<Content, ApiError> {
        match self.status {
            200 => Ok(Content::Success(serde_json::from_slice(&self.body)?)),
            204 | 404 => Ok(Content::Empty),
            status => Ok(Content::Failure {
                status,
                body: self.text().into_owned(),
            }),
        }
    }

    /// Turns a failure status into [`ApiError::Status`]. Success and empty
    /// responses pass through unchanged.
    pub fn error_for_failure(self) -> Result<Self, ApiError> {
        match self.status {
            200..=299 | 404 => Ok(self),
            _ => {
                warn!("{}", self.fail());
                Err(self.status_error())
            }
        }
    }

    /// The JSON payload of a 200 response, `None` for 204/404. Any other
    /// status, including an unexpected 2xx, is an [`ApiError::Status`].
    pub fn json_or_empty(&self) -> Result<Option<Value>, ApiError> {
        match self.content()? {
            Content::Success(json) => Ok(Some(json)),
            Content::Empty => Ok(None),
            Content::Failure { .. } => {
                warn!("Unexpected response {}", self.fail());
                Err(self.status_error())
            }
        }
    }

    fn status_error(&self) -> ApiError {
        ApiError::Status {
            url: self.url.clone(),
            status: self.status,
            body: self.text().into_owned(),
        }
    }

    /// Converts a `{"timestamp": [...], "value": [...]}` body into a series
    /// indexed by UTC timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TimeseriesNotFound`] when the body is not a
    /// successful JSON object with list-typed `value` and `timestamp` fields of
    /// equal length, and [`ApiError::InvalidTimestamp`] when a timestamp
    /// cannot be parsed.
    pub fn timeseries(&self) -> Result<TimeSeries, ApiError> {
        let content = self.content()?;
        let json = content.as_json().ok_or(ApiError::TimeseriesNotFound)?;

        let (Some(Value::Array(values)), Some(Value::Array(timestamps))) =
            (json.get("value"), json.get("timestamp"))
        else {
            return Err(ApiError::TimeseriesNotFound);
        };

        let index = timestamps
            .iter()
            .map(|raw| match raw {
                Value::String(s) => {
                    parse_timestamp(s).ok_or_else(|| ApiError::InvalidTimestamp(s.clone()))
                }
                other => Err(ApiError::InvalidTimestamp(other.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let values = values
            .iter()
            .map(|raw| match raw {
                Value::Number(n) => n.as_f64().ok_or(ApiError::TimeseriesNotFound),
                Value::Null => Ok(f64::NAN),
                Value::String(s) => s.parse::<f64>().map_err(|_| ApiError::TimeseriesNotFound),
                _ => Err(ApiError::TimeseriesNotFound),
            })
            .collect::<Result<Vec<_>, _>>()?;

        TimeSeries::new(index, values).map_err(|_| ApiError::TimeseriesNotFound)
    }

    pub(crate) fn required_header(&self, name: &'static str) -> Result<&str, ApiError> {
        self.header(name).ok_or(ApiError::MissingHeader(name))
    }

    pub(crate) fn header_f64(&self, name: &'static str) -> Result<f64, ApiError> {
        let raw = self.required_header(name)?;
        raw.trim().parse().map_err(|_| ApiError::InvalidHeader {
            name,
            value: raw.to_string(),
        })
    }

    /// Like [`Self::header_f64`], but a missing header or a `None`/empty value
    /// yields `None`.
    pub(crate) fn optional_header_f64(&self, name: &'static str) -> Result<Option<f64>, ApiError> {
        match self.header(name).map(str::trim) {
            None | Some("") | Some("None") | Some("null") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| ApiError::InvalidHeader {
                name,
                value: raw.to_string(),
            }),
        }
    }
}
