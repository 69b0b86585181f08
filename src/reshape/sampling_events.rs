//! Turns a flat table of measurements into nested [`Sample`]s.
//!
//! A lab or field export has one row per measurement. Rows sharing a station,
//! a day, an institution and (for analytes) a method belong to one sampling
//! event. Timestamps are rounded to the nearest day first, so two visits to
//! the same station on the same day end up in a single sample.

use crate::reshape::error::ReshapeError;
use crate::types::kinds::SampleKind;
use crate::types::measurement::Measurement;
use crate::types::sample::Sample;
use crate::types::sample_timeseries::SampleTimeseries;
use crate::utils::{parse_timestamp, round_to_day};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One row of a measurement table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub station: String,
    pub timestamp: DateTime<Utc>,
    pub institution: Option<String>,
    pub method: Option<String>,
    pub parameter: String,
    pub value: f64,
    pub unit: String,
    pub comment: Option<String>,
}

/// The identity of a sample: where, which day, by whom and, for analytes,
/// how it was analysed. `comment` is taken from the first row of the event.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingEvent {
    pub station: String,
    pub timestamp: DateTime<Utc>,
    pub institution: Option<String>,
    pub method: Option<String>,
    pub comment: Option<String>,
}

/// A measurement attached to the sampling event at index `event`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMeasurement {
    pub event: usize,
    pub measurement: Measurement,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EventKey<'a> {
    station: &'a str,
    day: DateTime<Utc>,
    institution: Option<&'a str>,
    method: Option<&'a str>,
}

impl<'a> EventKey<'a> {
    fn of(row: &'a MeasurementRow, kind: SampleKind) -> Self {
        Self {
            station: &row.station,
            day: round_to_day(row.timestamp),
            institution: row.institution.as_deref(),
            method: match kind {
                SampleKind::Parameters => None,
                SampleKind::Analytes => row.method.as_deref(),
            },
        }
    }
}

/// Reads a CSV export with a header row.
pub fn read_measurement_table(path: impl AsRef<Path>) -> Result<DataFrame, ReshapeError> {
    let path = path.as_ref();
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| ReshapeError::CsvRead(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| ReshapeError::CsvRead(path.to_path_buf(), e))
}

/// Extracts typed rows from a measurement table.
///
/// Required columns: `station`, `timestamp`, `parameter`, `value`, `unit`,
/// plus `method` for analytes. `institution` and `comment` may be absent.
/// `timestamp` may be a string column or a Polars date/datetime column.
pub fn records_from_frame(
    df: &DataFrame,
    kind: SampleKind,
) -> Result<Vec<MeasurementRow>, ReshapeError> {
    let height = df.height();
    let stations = string_column(df, "station")?;
    let timestamps = timestamp_column(df)?;
    let parameters = string_column(df, "parameter")?;
    let units = string_column(df, "unit")?;
    let values = float_column(df, "value")?;
    let institutions = optional_string_column(df, "institution")?;
    let comments = optional_string_column(df, "comment")?;
    let methods = if kind.event_columns().contains(&"method") {
        string_column(df, "method")?
    } else {
        optional_string_column(df, "method")?
    };

    let mut rows = Vec::with_capacity(height);
    for row in 0..height {
        rows.push(MeasurementRow {
            station: required(&stations, "station", row)?,
            timestamp: timestamps[row],
            institution: institutions[row].clone(),
            method: methods[row].clone(),
            parameter: required(&parameters, "parameter", row)?,
            value: values[row],
            unit: required(&units, "unit", row)?,
            comment: comments[row].clone(),
        });
    }
    Ok(rows)
}

/// Deduplicated sampling events, in order of first appearance, with their
/// timestamps rounded to the day.
pub fn sampling_events(rows: &[MeasurementRow], kind: SampleKind) -> Vec<SamplingEvent> {
    let mut seen = HashSet::new();
    let mut events = Vec::new();
    for row in rows {
        let key = EventKey::of(row, kind);
        let (day, method) = (key.day, key.method);
        if seen.insert(key) {
            events.push(SamplingEvent {
                station: row.station.clone(),
                timestamp: day,
                institution: row.institution.clone(),
                method: method.map(str::to_string),
                comment: row.comment.clone(),
            });
        }
    }
    events
}

/// Links every row to its sampling event.
///
/// Returns the events and, in row order, each row's measurement with the index
/// of its event. Analyte units are normalized on the way.
pub fn match_sampling_events_to_measurements(
    rows: &[MeasurementRow],
    kind: SampleKind,
) -> (Vec<SamplingEvent>, Vec<EventMeasurement>) {
    let events = sampling_events(rows, kind);
    let index: HashMap<EventKey, usize> = events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let key = EventKey {
                station: &event.station,
                day: event.timestamp,
                institution: event.institution.as_deref(),
                method: event.method.as_deref(),
            };
            (key, i)
        })
        .collect();

    let measurements = rows
        .iter()
        .filter_map(|row| {
            index.get(&EventKey::of(row, kind)).map(|&event| EventMeasurement {
                event,
                measurement: Measurement::new(kind, &row.parameter, row.value, &row.unit),
            })
        })
        .collect();

    (events, measurements)
}

/// Nests the matched measurements into one [`Sample`] per event.
pub fn generate_samples(
    events: Vec<SamplingEvent>,
    measurements: Vec<EventMeasurement>,
    kind: SampleKind,
) -> SampleTimeseries {
    let mut grouped: Vec<Vec<Measurement>> = vec![Vec::new(); events.len()];
    for EventMeasurement { event, measurement } in measurements {
        grouped[event].push(measurement);
    }

    let samples = events
        .into_iter()
        .zip(grouped)
        .map(|(event, measurements)| Sample {
            station: event.station,
            timestamp: event.timestamp,
            institution: event.institution,
            measurements,
            comment: event.comment,
            method: event.method,
        })
        .collect();

    SampleTimeseries::new(kind, samples)
}

pub fn create_parameter_timeseries_from_rows(
    rows: &[MeasurementRow],
    kind: SampleKind,
) -> SampleTimeseries {
    let (events, measurements) = match_sampling_events_to_measurements(rows, kind);
    debug!(
        "Grouped {} {} rows into {} sampling events",
        rows.len(),
        kind,
        events.len()
    );
    generate_samples(events, measurements, kind)
}

/// Builds a [`SampleTimeseries`] from a flat measurement table.
///
/// # Errors
///
/// Fails when a required column is missing, holds nulls, or a timestamp
/// cannot be parsed.
pub fn create_parameter_timeseries(
    df: &DataFrame,
    kind: SampleKind,
) -> Result<SampleTimeseries, ReshapeError> {
    let rows = records_from_frame(df, kind)?;
    Ok(create_parameter_timeseries_from_rows(&rows, kind))
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ReshapeError> {
    df.column(name)
        .map_err(|_| ReshapeError::MissingColumn(name.to_string()))
}

fn required(
    values: &[Option<String>],
    column: &'static str,
    row: usize,
) -> Result<String, ReshapeError> {
    values[row]
        .clone()
        .ok_or(ReshapeError::MissingValue { column, row })
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ReshapeError> {
    let casted = column(df, name)?.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

pub(crate) fn optional_string_column(
    df: &DataFrame,
    name: &str,
) -> Result<Vec<Option<String>>, ReshapeError> {
    if df.column(name).is_err() {
        return Ok(vec![None; df.height()]);
    }
    string_column(df, name)
}

/// Null values become `NaN`.
pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, ReshapeError> {
    let casted = column(df, name)?.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

pub(crate) fn timestamp_column(df: &DataFrame) -> Result<Vec<DateTime<Utc>>, ReshapeError> {
    let timestamps = column(df, "timestamp")?;
    let invalid = |row: usize, value: String| ReshapeError::InvalidTimestamp { row, value };

    match timestamps.dtype() {
        DataType::String => timestamps
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.and_then(parse_timestamp)
                    .ok_or_else(|| invalid(row, v.unwrap_or_default().to_string()))
            })
            .collect(),
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let raw = timestamps.cast(&DataType::Int64)?;
            raw.i64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    v.and_then(|v| match unit {
                        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
                        TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
                        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
                    })
                    .ok_or_else(|| invalid(row, format!("{v:?}")))
                })
                .collect()
        }
        DataType::Date => {
            let raw = timestamps.cast(&DataType::Int32)?;
            raw.i32()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    v.map(|days| DateTime::<Utc>::UNIX_EPOCH + Duration::days(days.into()))
                        .ok_or_else(|| invalid(row, "null".to_string()))
                })
                .collect()
        }
        other => Err(ReshapeError::UnsupportedTimestampType(other.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    fn row(station: &str, timestamp: &str, parameter: &str, value: f64) -> MeasurementRow {
        MeasurementRow {
            station: station.to_string(),
            timestamp: parse_timestamp(timestamp).unwrap(),
            institution: Some("Deltares".to_string()),
            method: None,
            parameter: parameter.to_string(),
            value,
            unit: "-".to_string(),
            comment: None,
        }
    }

    #[test]
    fn test_same_day_rows_collapse_into_one_sample() {
        let rows = vec![
            MeasurementRow {
                comment: Some("turbid".to_string()),
                ..row("PZ01", "2023-06-01 09:10:00", "pH", 7.1)
            },
            row("PZ01", "2023-06-01 11:30:00", "EC", 480.0),
            row("PZ02", "2023-06-01 10:00:00", "pH", 6.8),
        ];

        let samples = create_parameter_timeseries_from_rows(&rows, SampleKind::Parameters);
        assert_eq!(samples.len(), 2);

        let first = &samples[0];
        assert_eq!(first.station, "PZ01");
        assert_eq!(first.timestamp, Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(first.comment.as_deref(), Some("turbid"));
        assert_eq!(first.parameters().collect::<Vec<_>>(), vec!["pH", "EC"]);
        assert_eq!(samples[1].station, "PZ02");
    }

    #[test]
    fn test_evening_rows_move_to_next_day() {
        let rows = vec![
            row("PZ01", "2023-06-01 08:00:00", "pH", 7.1),
            row("PZ01", "2023-06-01 20:00:00", "pH", 7.3),
        ];
        let events = sampling_events(&rows, SampleKind::Parameters);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].timestamp, Utc.with_ymd_and_hms(2023, 6, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_different_institutions_are_different_events() {
        let rows = vec![
            row("PZ01", "2023-06-01 09:00:00", "pH", 7.1),
            MeasurementRow {
                institution: Some("WUR".to_string()),
                ..row("PZ01", "2023-06-01 09:00:00", "pH", 7.0)
            },
        ];
        assert_eq!(sampling_events(&rows, SampleKind::Parameters).len(), 2);
    }

    #[test]
    fn test_analytes_split_on_method_and_normalize() {
        let rows = vec![
            MeasurementRow {
                method: Some("ICP-MS".to_string()),
                unit: "µg/L".to_string(),
                ..row("PZ01", "2023-06-01 09:00:00", "As", 500.0)
            },
            MeasurementRow {
                method: Some("IC".to_string()),
                unit: "mg/L".to_string(),
                ..row("PZ01", "2023-06-01 09:00:00", "NO3", 9999.0)
            },
        ];

        let (events, measurements) =
            match_sampling_events_to_measurements(&rows, SampleKind::Analytes);
        assert_eq!(events.len(), 2);
        assert_eq!(measurements[0].event, 0);
        assert_eq!(measurements[1].event, 1);

        let samples = generate_samples(events, measurements, SampleKind::Analytes);
        assert_eq!(samples[0].method.as_deref(), Some("ICP-MS"));
        assert_eq!(samples[0].measurements[0].unit(), "mg/L");
        assert_eq!(samples[0].measurements[0].value(), 0.5);
        assert_eq!(samples[1].measurements[0].value(), 0.0);
    }

    #[test]
    fn test_method_is_ignored_for_parameters() {
        let rows = vec![
            MeasurementRow {
                method: Some("probe".to_string()),
                ..row("PZ01", "2023-06-01 09:00:00", "pH", 7.1)
            },
            MeasurementRow {
                method: Some("strip".to_string()),
                ..row("PZ01", "2023-06-01 09:00:00", "EC", 500.0)
            },
        ];
        let events = sampling_events(&rows, SampleKind::Parameters);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].method, None);
    }

    #[test]
    fn test_frame_requires_method_for_analytes() -> PolarsResult<()> {
        let df = polars::df!(
            "station" => ["PZ01"],
            "timestamp" => ["2023-06-01"],
            "parameter" => ["NO3"],
            "value" => [1.0],
            "unit" => ["mg/L"],
        )?;
        assert!(matches!(
            create_parameter_timeseries(&df, SampleKind::Analytes),
            Err(ReshapeError::MissingColumn(c)) if c == "method"
        ));
        assert!(create_parameter_timeseries(&df, SampleKind::Parameters).is_ok());
        Ok(())
    }

    #[test]
    fn test_frame_rejects_bad_timestamps() -> PolarsResult<()> {
        let df = polars::df!(
            "station" => ["PZ01", "PZ01"],
            "timestamp" => ["2023-06-01", "first of june"],
            "parameter" => ["pH", "pH"],
            "value" => [7.0, 7.1],
            "unit" => ["-", "-"],
        )?;
        assert!(matches!(
            records_from_frame(&df, SampleKind::Parameters),
            Err(ReshapeError::InvalidTimestamp { row: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_read_measurement_table() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "station,timestamp,institution,parameter,value,unit,comment")?;
        writeln!(file, "PZ01,2023-06-01 09:00:00,Deltares,pH,7.1,-,")?;
        writeln!(file, "PZ01,2023-06-01 10:00:00,Deltares,EC,480,uS/cm,dry")?;
        writeln!(file, "PZ03,2023-06-02 10:00:00,Deltares,pH,6.9,-,")?;
        file.flush()?;

        let df = read_measurement_table(file.path())?;
        let samples = create_parameter_timeseries(&df, SampleKind::Parameters)?;

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].measurements.len(), 2);
        assert_eq!(samples[0].comment, None);
        assert_eq!(samples.unique_stations(), vec!["PZ01", "PZ03"]);
        Ok(())
    }
}
