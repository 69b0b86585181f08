//! Read operations against the API.
//!
//! Lookup tables come back as Polars `DataFrame`s, samples as a
//! [`SampleTimeseries`], and logger or manual records as one of the
//! timeseries types together with the metadata the server sends in `X-*`
//! response headers.

use crate::api::endpoints::ListTarget;
use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::WatersyncClient;
use crate::error::WaterspyError;
use crate::types::error::ModelError;
use crate::types::kinds::{SampleKind, SampleType};
use crate::types::measurement::Measurement;
use crate::types::sample::Sample;
use crate::types::sample_timeseries::SampleTimeseries;
use crate::types::timeseries::{
    GWLevelManualMeasurement, LoggerMeasurement, MeteoLoggerMeasurement, SubirriTimeseries,
};
use crate::utils::parse_timestamp;
use bon::builder;
use chrono::{DateTime, Utc};
use log::{debug, info};
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::io::Cursor;

const SUBIRRIGATION_UNIT: &str = "m3/h";

/// Fetches one of the lookup tables as a `DataFrame`.
///
/// An empty table, or a 204/404 response, gives an empty frame. Any other
/// status that is not 200 is an error.
///
/// # Examples
///
/// ```no_run
/// use waterspy::{get_options, ListTarget, WaterspyError, WatersyncClient};
///
/// # fn main() -> Result<(), WaterspyError> {
/// let client = WatersyncClient::builder()
///     .base_url("https://watersync.example.org/api")
///     .token("abc123")
///     .build();
/// let units = get_options(&client, ListTarget::Units)?;
/// println!("{units}");
/// # Ok(())
/// # }
/// ```
pub fn get_options(client: &WatersyncClient, target: ListTarget) -> Result<DataFrame, WaterspyError> {
    let response = client
        .request(client.endpoints().list(target))
        .get()?
        .error_for_failure()?;
    match response.json_or_empty()? {
        Some(Value::Array(rows)) if rows.is_empty() => Ok(DataFrame::empty()),
        Some(json) => {
            let bytes = serde_json::to_vec(&json).map_err(ApiError::from)?;
            Ok(JsonReader::new(Cursor::new(bytes)).finish()?)
        }
        None => Ok(DataFrame::empty()),
    }
}

#[derive(Deserialize)]
struct RawSample {
    #[serde(alias = "station")]
    content_object: Value,
    timestamp: String,
    #[serde(default)]
    institution: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    measurements: Vec<RawMeasurement>,
}

#[derive(Deserialize)]
struct RawMeasurement {
    value: Option<f64>,
    unit: String,
    #[serde(alias = "analyte")]
    parameter: String,
}

impl RawSample {
    fn into_sample(self, kind: SampleKind) -> Result<Sample, ApiError> {
        let timestamp = parse_timestamp(&self.timestamp)
            .ok_or_else(|| ApiError::InvalidTimestamp(self.timestamp.clone()))?;
        let station = match self.content_object {
            Value::String(station) => station,
            other => other.to_string(),
        };
        let measurements = self
            .measurements
            .into_iter()
            .map(|m| Measurement::new(kind, m.parameter, m.value.unwrap_or(f64::NAN), m.unit))
            .collect();

        Ok(Sample {
            station,
            timestamp,
            institution: self.institution,
            measurements,
            comment: self.comment,
            method: self.method,
        })
    }
}

/// Fetches parameter or analytical samples.
///
/// # Arguments
///
/// * `.client(&WatersyncClient)`: **Required.**
/// * `.kind(SampleKind)`: **Required.** Parameters or analytes.
/// * `.sample_type(SampleType)`: **Required.**
/// * `.stations(&[&str])`: Optional. Restricts the result to these stations.
/// * `.timestamp_start(DateTime<Utc>)`, `.timestamp_end(DateTime<Utc>)`: Optional.
///
/// # Errors
///
/// [`ApiError::Status`] for a failure status, [`ApiError::JsonParse`] when the
/// body is not a list of samples.
#[builder]
pub fn get_samples(
    client: &WatersyncClient,
    kind: SampleKind,
    sample_type: SampleType,
    stations: Option<&[&str]>,
    timestamp_start: Option<DateTime<Utc>>,
    timestamp_end: Option<DateTime<Utc>>,
) -> Result<SampleTimeseries, WaterspyError> {
    let response = client
        .request(kind.endpoint())
        .with_optional_params([
            ("stations", stations.filter(|s| !s.is_empty()).map(|s| s.join(","))),
            ("timestamp_start", timestamp_start.map(|t| t.to_rfc3339())),
            ("timestamp_end", timestamp_end.map(|t| t.to_rfc3339())),
            ("sample_type", Some(sample_type.key().to_string())),
            ("what", Some(kind.key().to_string())),
        ])
        .get()?
        .error_for_failure()?;

    let Some(json) = response.json_or_empty()? else {
        return Ok(SampleTimeseries::new(kind, Vec::new()));
    };

    let samples = serde_json::from_value::<Vec<RawSample>>(json)
        .map_err(ApiError::from)?
        .into_iter()
        .map(|raw| raw.into_sample(kind))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Fetched {} {} samples", samples.len(), kind);
    Ok(SampleTimeseries::new(kind, samples))
}

/// Runs a timeseries query. `Ok(None)` when the server has no records.
fn fetch_timeseries(
    client: &WatersyncClient,
    endpoint: &str,
    station: Option<&str>,
    logger: Option<&str>,
    params: Vec<(&'static str, Option<String>)>,
) -> Result<Option<WaterResponse>, WaterspyError> {
    if station.is_none() && logger.is_none() {
        return Err(ModelError::MissingStationOrLogger.into());
    }

    let request = client
        .request(endpoint)
        .with_optional_params([
            ("station", station.map(str::to_string)),
            ("logger", logger.map(str::to_string)),
        ])
        .with_optional_params(params);
    debug!("Timeseries query {} {:?}", request.full_url(), request.params());

    let response = request.get()?.error_for_failure()?;
    if response.json_or_empty()?.is_none() {
        return Ok(None);
    }
    Ok(Some(response))
}

fn period_params(
    timestamp_start: Option<DateTime<Utc>>,
    timestamp_end: Option<DateTime<Utc>>,
) -> Vec<(&'static str, Option<String>)> {
    vec![
        ("timestamp_start", timestamp_start.map(|t| t.to_rfc3339())),
        ("timestamp_end", timestamp_end.map(|t| t.to_rfc3339())),
    ]
}

/// Fetches the manual groundwater-level readings of a station.
///
/// Station, top-of-casing altitude and height come from the `X-Station`,
/// `X-TOCAltitude` and `X-TOCHeight` headers.
///
/// # Errors
///
/// [`ModelError::MissingStationOrLogger`] without a station.
#[builder]
pub fn get_manual_groundwater_levels(
    client: &WatersyncClient,
    station: Option<&str>,
    timestamp_start: Option<DateTime<Utc>>,
    timestamp_end: Option<DateTime<Utc>>,
) -> Result<Option<GWLevelManualMeasurement>, WaterspyError> {
    let Some(response) = fetch_timeseries(
        client,
        &client.endpoints().groundwater_manual_measurements,
        station,
        None,
        period_params(timestamp_start, timestamp_end),
    )?
    else {
        return Ok(None);
    };

    Ok(Some(GWLevelManualMeasurement {
        timeseries: response.timeseries()?,
        station: response.required_header("X-Station")?.to_string(),
        toc_altitude: response.header_f64("X-TOCAltitude")?,
        toc_height: response.header_f64("X-TOCHeight")?,
    }))
}

/// Fetches groundwater logger records by station, logger, or both.
#[builder]
pub fn get_groundwater_logger(
    client: &WatersyncClient,
    station: Option<&str>,
    logger: Option<&str>,
    measurement_type: Option<&str>,
    timestamp_start: Option<DateTime<Utc>>,
    timestamp_end: Option<DateTime<Utc>>,
) -> Result<Option<LoggerMeasurement>, WaterspyError> {
    let mut params = period_params(timestamp_start, timestamp_end);
    params.push(("measurement_type", measurement_type.map(str::to_string)));

    let Some(response) = fetch_timeseries(
        client,
        &client.endpoints().groundwater_logger_measurements,
        station,
        logger,
        params,
    )?
    else {
        return Ok(None);
    };

    Ok(Some(LoggerMeasurement {
        timeseries: response.timeseries()?,
        station: response.required_header("X-Station")?.to_string(),
        logger: response.required_header("X-Logger")?.to_string(),
        measurement_type: response.required_header("X-MeasurementType")?.to_string(),
        unit: response.required_header("X-Unit")?.to_string(),
        logger_altitude: response.optional_header_f64("X-LoggerAltitude")?,
    }))
}

/// Fetches meteo logger records by station, logger, or both.
#[builder]
pub fn get_meteo_logger(
    client: &WatersyncClient,
    station: Option<&str>,
    logger: Option<&str>,
    measurement_type: Option<&str>,
    timestamp_start: Option<DateTime<Utc>>,
    timestamp_end: Option<DateTime<Utc>>,
) -> Result<Option<MeteoLoggerMeasurement>, WaterspyError> {
    let mut params = period_params(timestamp_start, timestamp_end);
    params.push(("measurement_type", measurement_type.map(str::to_string)));

    let Some(response) = fetch_timeseries(
        client,
        &client.endpoints().meteo_logger_measurements,
        station,
        logger,
        params,
    )?
    else {
        return Ok(None);
    };

    Ok(Some(MeteoLoggerMeasurement {
        timeseries: response.timeseries()?,
        station: response.required_header("X-Station")?.to_string(),
        logger: response.required_header("X-Logger")?.to_string(),
        measurement_type: response.required_header("X-MeasurementType")?.to_string(),
        unit: response.required_header("X-Unit")?.to_string(),
    }))
}

/// Fetches flow records of a subirrigation location, optionally aggregated
/// over `period` (e.g. `"1D"`).
///
/// The metadata is taken from the arguments; flows are in m3/h.
#[builder]
pub fn get_subirri_logger(
    client: &WatersyncClient,
    station: Option<&str>,
    logger: Option<&str>,
    measurement_type: Option<&str>,
    timestamp_start: Option<DateTime<Utc>>,
    timestamp_end: Option<DateTime<Utc>>,
    period: Option<&str>,
) -> Result<Option<SubirriTimeseries>, WaterspyError> {
    let mut params = period_params(timestamp_start, timestamp_end);
    params.push(("measurement_type", measurement_type.map(str::to_string)));
    params.push(("period", period.map(str::to_string)));

    let Some(response) = fetch_timeseries(
        client,
        &client.endpoints().subirrigation_logger_records,
        station,
        logger,
        params,
    )?
    else {
        return Ok(None);
    };

    Ok(Some(SubirriTimeseries {
        timeseries: response.timeseries()?,
        measurement_type: measurement_type.unwrap_or_default().to_string(),
        logger: logger.unwrap_or_default().to_string(),
        subirri_location: station
            .or_else(|| response.header("X-Station"))
            .unwrap_or_default()
            .to_string(),
        unit: SUBIRRIGATION_UNIT.to_string(),
    }))
}
