//! Time-indexed numeric series and the logger / manual-measurement records
//! built on top of them.
//!
//! Every variant pairs a [`TimeSeries`] with the metadata that identifies it
//! on the API and knows the endpoint it is uploaded to.

use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::WatersyncClient;
use crate::types::error::ModelError;
use chrono::{DateTime, Utc};
use log::info;
use polars::prelude::*;
use serde_json::{json, Value};
use std::fmt;

const SUBIRRIGATION_UPLOAD_ENDPOINT: &str = "subirri/measurement";

/// A series of values indexed by UTC timestamps.
///
/// Missing values are stored as `NaN` and uploaded as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: Option<String>,
    index: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// # Errors
    ///
    /// Returns [`ModelError::LengthMismatch`] if `index` and `values` differ in length.
    pub fn new(index: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self, ModelError> {
        if index.len() != values.len() {
            return Err(ModelError::LengthMismatch {
                index: index.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            name: None,
            index,
            values,
        })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (DateTime<Utc>, f64)>) -> Self {
        let (index, values) = pairs.into_iter().unzip();
        Self {
            name: None,
            index,
            values,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `timestamp`; the last one if the index holds duplicates.
    pub fn get(&self, timestamp: DateTime<Utc>) -> Option<f64> {
        self.iter()
            .filter(|(ts, _)| *ts == timestamp)
            .map(|(_, value)| value)
            .last()
    }

    /// Subtracts `scalar` from every value.
    pub fn sub(&self, scalar: f64) -> TimeSeries {
        TimeSeries {
            name: self.name.clone(),
            index: self.index.clone(),
            values: self.values.iter().map(|v| v - scalar).collect(),
        }
    }

    /// Sorts by timestamp; equal timestamps keep their relative order.
    pub fn sort_index(self) -> TimeSeries {
        let name = self.name.clone();
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by_key(|(ts, _)| *ts);
        let mut sorted = TimeSeries::from_pairs(pairs);
        sorted.name = name;
        sorted
    }

    /// `[{"timestamp": <RFC 3339>, "value": v}, ...]`, the shape the logger
    /// record endpoints accept.
    pub fn to_records(&self) -> Value {
        Value::Array(
            self.iter()
                .map(|(ts, value)| json!({ "timestamp": ts.to_rfc3339(), "value": value }))
                .collect(),
        )
    }

    /// Two-column frame: `timestamp` (UTC, millisecond precision) and the
    /// values under the series name, or `value` when unnamed.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let millis: Vec<i64> = self.index.iter().map(DateTime::timestamp_millis).collect();
        let timestamp = Series::new("timestamp".into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        let values = Series::new(self.name().unwrap_or("value").into(), self.values.clone());
        DataFrame::new(vec![timestamp.into(), values.into()])
    }
}

fn post_records(
    client: &WatersyncClient,
    endpoint: &str,
    params: [(&str, &str); 4],
    data: Value,
) -> Result<WaterResponse, ApiError> {
    client
        .request(endpoint)
        .with_optional_params(params.map(|(k, v)| (k, Some(v))))
        .with_data(data)
        .post()?
        .error_for_failure()
}

/// Manual groundwater-level readings: distance from the top of casing (TOC)
/// down to the water table.
///
/// The TOC geometry is assumed constant over the whole series.
#[derive(Debug, Clone, PartialEq)]
pub struct GWLevelManualMeasurement {
    pub timeseries: TimeSeries,
    pub station: String,
    pub toc_altitude: f64,
    pub toc_height: f64,
}

impl GWLevelManualMeasurement {
    pub fn groundwater_depth(&self) -> TimeSeries {
        self.timeseries.sub(self.toc_height)
    }

    pub fn groundwater_elevation(&self) -> TimeSeries {
        self.timeseries.sub(self.toc_altitude)
    }

    pub fn to_records(&self) -> Value {
        Value::Array(
            self.timeseries
                .iter()
                .map(|(ts, depth)| {
                    json!({ "timestamp": ts.to_rfc3339(), "depth": depth, "station": self.station })
                })
                .collect(),
        )
    }

    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        info!("Uploading manual groundwater levels: {}", self);
        client
            .request(&client.endpoints().groundwater_manual_measurements)
            .with_data(self.to_records())
            .post()?
            .error_for_failure()
    }
}

impl fmt::Display for GWLevelManualMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.station)
    }
}

/// Groundwater logger records.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerMeasurement {
    pub timeseries: TimeSeries,
    pub station: String,
    pub logger: String,
    pub measurement_type: String,
    pub unit: String,
    pub logger_altitude: Option<f64>,
}

impl LoggerMeasurement {
    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        info!("Uploading timeseries: {}", self);
        post_records(
            client,
            &client.endpoints().groundwater_logger_measurements,
            [
                ("station", self.station.as_str()),
                ("logger", self.logger.as_str()),
                ("measurement_type", self.measurement_type.as_str()),
                ("unit", self.unit.as_str()),
            ],
            self.timeseries.to_records(),
        )
    }
}

impl fmt::Display for LoggerMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} ({})", self.measurement_type, self.station, self.logger)
    }
}

/// Records from a logger at a meteorological station, typically the
/// barometric pressure used to compensate groundwater loggers.
#[derive(Debug, Clone, PartialEq)]
pub struct MeteoLoggerMeasurement {
    pub timeseries: TimeSeries,
    pub station: String,
    pub logger: String,
    pub measurement_type: String,
    pub unit: String,
}

impl MeteoLoggerMeasurement {
    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        info!("Uploading meteo timeseries: {}", self);
        post_records(
            client,
            &client.endpoints().meteo_logger_measurements,
            [
                ("station", self.station.as_str()),
                ("logger", self.logger.as_str()),
                ("measurement_type", self.measurement_type.as_str()),
                ("unit", self.unit.as_str()),
            ],
            self.timeseries.to_records(),
        )
    }
}

impl fmt::Display for MeteoLoggerMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} ({})", self.measurement_type, self.station, self.logger)
    }
}

/// Flow records from a subirrigation location.
#[derive(Debug, Clone, PartialEq)]
pub struct SubirriTimeseries {
    pub timeseries: TimeSeries,
    pub measurement_type: String,
    pub logger: String,
    pub subirri_location: String,
    pub unit: String,
}

impl SubirriTimeseries {
    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        info!("Uploading subirrigation timeseries: {}", self);
        post_records(
            client,
            SUBIRRIGATION_UPLOAD_ENDPOINT,
            [
                ("station", self.subirri_location.as_str()),
                ("logger", self.logger.as_str()),
                ("measurement_type", self.measurement_type.as_str()),
                ("unit", self.unit.as_str()),
            ],
            self.timeseries.to_records(),
        )
    }
}

impl fmt::Display for SubirriTimeseries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.measurement_type, self.subirri_location)
    }
}
