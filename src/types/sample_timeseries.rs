//! Collections of water-quality samples and their tabular projections.

use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::WatersyncClient;
use crate::types::error::ModelError;
use crate::types::utc::IntoUtcDateTime;
use crate::types::kinds::{SampleKind, SampleType};
use crate::types::sample::Sample;
use crate::types::timeseries::TimeSeries;
use bon::bon;
use chrono::{DateTime, Utc};
use log::info;
use polars::prelude::*;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Index;

/// An ordered collection of [`Sample`]s of one [`SampleKind`].
///
/// Samples keep the order they were created or received in. The projections
/// ([`Self::wide_ts`], [`Self::long_ts`], [`Self::statistics`]) build one
/// series per (station, parameter) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTimeseries {
    kind: SampleKind,
    samples: Vec<Sample>,
}

#[bon]
impl SampleTimeseries {
    pub fn new(kind: SampleKind, samples: Vec<Sample>) -> Self {
        Self { kind, samples }
    }

    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Sorted, deduplicated station names.
    pub fn unique_stations(&self) -> Vec<String> {
        self.samples
            .iter()
            .map(|s| s.station.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, deduplicated parameter names across all measurements.
    pub fn unique_parameters(&self) -> Vec<String> {
        self.samples
            .iter()
            .flat_map(Sample::parameters)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Selects samples matching every given criterion.
    ///
    /// Criteria left unset do not filter. `start` and `end` are inclusive.
    /// When `parameters` is set, each remaining sample keeps only those
    /// measurements and samples without any of them are dropped.
    ///
    /// # Arguments
    ///
    /// * `.stations(&[&str])`: Optional.
    /// * `.parameters(&[&str])`: Optional.
    /// * `.institutions(&[&str])`: Optional. Samples without an institution never match.
    /// * `.start(DateTime<Utc>)`, `.end(DateTime<Utc>)`: Optional.
    ///
    /// # Errors
    ///
    /// [`ModelError::NoSamplesFound`] when no sample is left.
    #[builder]
    pub fn filter_samples(
        &self,
        stations: Option<&[&str]>,
        parameters: Option<&[&str]>,
        institutions: Option<&[&str]>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<SampleTimeseries, ModelError> {
        let matches = |sample: &Sample| {
            if let Some(stations) = stations {
                if !stations.contains(&sample.station.as_str()) {
                    return false;
                }
            }
            if let Some(institutions) = institutions {
                match &sample.institution {
                    Some(institution) if institutions.contains(&institution.as_str()) => {}
                    _ => return false,
                }
            }
            if start.is_some_and(|start| sample.timestamp < start) {
                return false;
            }
            if end.is_some_and(|end| sample.timestamp > end) {
                return false;
            }
            true
        };

        let samples: Vec<Sample> = self
            .samples
            .iter()
            .filter(|sample| matches(sample))
            .filter_map(|sample| match parameters {
                Some(parameters) if !parameters.is_empty() => sample.filter_measurements(parameters),
                _ => Some(sample.clone()),
            })
            .collect();

        if samples.is_empty() {
            return Err(ModelError::NoSamplesFound);
        }
        Ok(SampleTimeseries::new(self.kind, samples))
    }

    /// Samples taken between `start` and `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidPeriodBound`] when a bound is not a valid instant,
    /// [`ModelError::NoSamplesFound`] when nothing falls in the period.
    pub fn between(
        &self,
        start: impl IntoUtcDateTime,
        end: impl IntoUtcDateTime,
    ) -> Result<SampleTimeseries, ModelError> {
        let start = start.into_utc().ok_or(ModelError::InvalidPeriodBound)?;
        let end = end.into_utc().ok_or(ModelError::InvalidPeriodBound)?;
        self.filter_samples().start(start).end(end).call()
    }

    /// Series of one parameter at one station, sorted by timestamp and named
    /// `"{station}-{parameter}"`.
    ///
    /// If a timestamp occurs more than once, the value seen last wins.
    pub fn create_ts(&self, parameter: &str, station: &str) -> TimeSeries {
        let points: BTreeMap<DateTime<Utc>, f64> = self
            .samples
            .iter()
            .filter(|sample| sample.station == station)
            .flat_map(|sample| {
                sample
                    .measurements
                    .iter()
                    .filter(|m| m.parameter() == parameter)
                    .map(|m| (sample.timestamp, m.value()))
            })
            .collect();

        TimeSeries::from_pairs(points).with_name(format!("{station}-{parameter}"))
    }

    /// One series per (parameter, station) combination, including the
    /// combinations that have no measurements.
    pub fn timeseries_list(&self) -> Vec<TimeSeries> {
        let stations = self.unique_stations();
        self.unique_parameters()
            .iter()
            .flat_map(|parameter| {
                stations
                    .iter()
                    .map(move |station| self.create_ts(parameter, station))
            })
            .collect()
    }

    /// All series side by side: a `timestamp` column holding every timestamp
    /// that occurs, plus one nullable column per `"{station}-{parameter}"`.
    pub fn wide_ts(&self) -> PolarsResult<DataFrame> {
        let series = self.timeseries_list();
        let index: Vec<DateTime<Utc>> = series
            .iter()
            .flat_map(|ts| ts.index().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let millis: Vec<i64> = index.iter().map(DateTime::timestamp_millis).collect();
        let mut columns: Vec<Column> = vec![Series::new("timestamp".into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            .into()];

        for ts in &series {
            let values: Vec<Option<f64>> = index
                .iter()
                .map(|t| ts.get(*t).filter(|v| !v.is_nan()))
                .collect();
            columns.push(Series::new(ts.name().unwrap_or_default().into(), values).into());
        }

        DataFrame::new(columns)
    }

    /// All measurements stacked as `station`, `parameter`, `timestamp`, `value`,
    /// ordered by parameter, station and time. Missing readings are null.
    pub fn long_ts(&self) -> PolarsResult<DataFrame> {
        let mut stations = Vec::new();
        let mut parameters = Vec::new();
        let mut millis = Vec::new();
        let mut values = Vec::new();

        let station_names = self.unique_stations();
        for parameter in self.unique_parameters() {
            for station in &station_names {
                for (timestamp, value) in self.create_ts(&parameter, station).iter() {
                    stations.push(station.clone());
                    parameters.push(parameter.clone());
                    millis.push(timestamp.timestamp_millis());
                    values.push((!value.is_nan()).then_some(value));
                }
            }
        }

        DataFrame::new(vec![
            Series::new("station".into(), stations).into(),
            Series::new("parameter".into(), parameters).into(),
            Series::new("timestamp".into(), millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .into(),
            Series::new("value".into(), values).into(),
        ])
    }

    /// Summary statistics per station and parameter: `mean`, `std` (sample),
    /// `min`, `max`, `count` and `median`. Missing readings are skipped.
    pub fn statistics(&self) -> PolarsResult<DataFrame> {
        self.long_ts()?
            .lazy()
            .group_by([col("station"), col("parameter")])
            .agg([
                col("value").mean().alias("mean"),
                col("value").std(1).alias("std"),
                col("value").min().alias("min"),
                col("value").max().alias("max"),
                col("value").count().alias("count"),
                col("value").median().alias("median"),
            ])
            .sort_by_exprs(
                vec![col("station"), col("parameter")],
                SortMultipleOptions::default(),
            )
            .collect()
    }

    /// The JSON array posted to the samples endpoint. Unset fields are omitted.
    pub fn prepare_upload(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.samples)
    }

    pub fn upload(
        &self,
        client: &WatersyncClient,
        sample_type: Option<SampleType>,
    ) -> Result<WaterResponse, ApiError> {
        info!("Uploading {} timeseries: {}", self.kind, self);
        client
            .request(self.kind.endpoint())
            .with_optional_params([("sample_type", sample_type.map(|t| t.key()))])
            .with_data(self.prepare_upload()?)
            .post()?
            .error_for_failure()
    }
}

impl Index<usize> for SampleTimeseries {
    type Output = Sample;

    fn index(&self, index: usize) -> &Self::Output {
        &self.samples[index]
    }
}

impl<'a> IntoIterator for &'a SampleTimeseries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl fmt::Display for SampleTimeseries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleTimeseries({})", self.samples.len())
    }
}
