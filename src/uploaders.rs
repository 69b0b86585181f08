//! Write operations against the API.
//!
//! All of them return the server's response on success and an error for any
//! failure status, so no record is dropped silently.

use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::WatersyncClient;
use crate::error::WaterspyError;
use crate::reshape::sampling_events::{float_column, optional_string_column, timestamp_column};
use crate::types::kinds::SampleType;
use crate::types::logger::{Logger, LoggerDeployment};
use crate::types::sample_timeseries::SampleTimeseries;
use crate::types::timeseries::{GWLevelManualMeasurement, SubirriTimeseries};
use bon::builder;
use chrono::{DateTime, Utc};
use log::info;
use polars::prelude::DataFrame;
use serde_json::{json, Map, Value};

pub fn upload_samples(
    client: &WatersyncClient,
    samples: &SampleTimeseries,
    sample_type: SampleType,
) -> Result<WaterResponse, ApiError> {
    samples.upload(client, Some(sample_type))
}

pub fn upload_subirrigation_data(
    client: &WatersyncClient,
    timeseries: &SubirriTimeseries,
) -> Result<WaterResponse, ApiError> {
    timeseries.upload(client)
}

pub fn upload_manual_groundwater_levels(
    client: &WatersyncClient,
    measurement: &GWLevelManualMeasurement,
) -> Result<WaterResponse, ApiError> {
    measurement.upload(client)
}

/// Uploads manual readings kept in a table with `timestamp` and `depth`
/// columns and an optional `comment` column.
pub fn upload_manual_groundwater_table(
    client: &WatersyncClient,
    station: &str,
    table: &DataFrame,
) -> Result<WaterResponse, WaterspyError> {
    let timestamps = timestamp_column(table)?;
    let depths = float_column(table, "depth")?;
    let comments = optional_string_column(table, "comment")?;

    let records: Vec<Value> = timestamps
        .iter()
        .zip(depths)
        .zip(comments)
        .map(|((timestamp, depth), comment)| {
            json!({
                "timestamp": timestamp.to_rfc3339(),
                "depth": depth,
                "comment": comment,
                "station": station,
            })
        })
        .collect();

    info!("Uploading {} manual readings for {}", records.len(), station);
    Ok(client
        .request(&client.endpoints().groundwater_manual_measurements)
        .with_data(Value::Array(records))
        .post()?
        .error_for_failure()?)
}

/// Registers the deployment of a logger in a piezometer.
///
/// # Arguments
///
/// * `.client(&WatersyncClient)`: **Required.**
/// * `.logger(&str)`: **Required.** Serial number of the logger.
/// * `.piezometer(&str)`: **Required.** Station the logger is installed in.
/// * `.date_start(DateTime<Utc>)`: **Required.**
/// * `.measurement_types(Vec<String>)`: **Required.**
/// * `.rope_len(f64)`: **Required.** Cable length below the top of casing.
/// * `.logger_alt(f64)`: Optional.
/// * `.comment(&str)`: Optional.
#[builder]
pub fn deploy_logger(
    client: &WatersyncClient,
    logger: &str,
    piezometer: &str,
    date_start: DateTime<Utc>,
    measurement_types: Vec<String>,
    rope_len: f64,
    logger_alt: Option<f64>,
    comment: Option<&str>,
) -> Result<WaterResponse, ApiError> {
    LoggerDeployment {
        deployed_at: Some(date_start),
        measurement_type: Some(measurement_types),
        rope_length: Some(rope_len),
        logger_altitude: logger_alt,
        comment: comment.map(str::to_string),
        ..LoggerDeployment::new(logger, piezometer)
    }
    .upload(client)
}

/// Registers a new logger.
#[builder]
pub fn upload_logger(
    client: &WatersyncClient,
    serial_no: &str,
    logger_type: &str,
    model: Map<String, Value>,
    owner: Vec<String>,
    measurement_types: Vec<String>,
    comment: Option<&str>,
    available: bool,
) -> Result<WaterResponse, ApiError> {
    Logger {
        logger_type: Some(logger_type.to_string()),
        available: Some(available),
        owner: Some(owner),
        measurement_type: Some(measurement_types),
        model: Some(model),
        comment: comment.map(str::to_string),
        ..Logger::new(serial_no)
    }
    .upload(client)
}
