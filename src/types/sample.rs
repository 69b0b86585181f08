//! A single physical sample and the measurements taken from it.

use crate::types::measurement::Measurement;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// One collection event at a station, holding every measurement made on it.
///
/// Analytical samples also record the analytical `method`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub station: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub measurements: Vec<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl Sample {
    pub fn new(
        station: impl Into<String>,
        timestamp: DateTime<Utc>,
        measurements: Vec<Measurement>,
    ) -> Self {
        Self {
            station: station.into(),
            timestamp,
            institution: None,
            measurements,
            comment: None,
            method: None,
        }
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.measurements.iter().map(Measurement::parameter)
    }

    /// Keeps only the measurements of the given parameters.
    ///
    /// Returns a new sample with the same metadata, or `None` when none of its
    /// measurements match.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use waterspy::{Parameter, Sample};
    ///
    /// let sample = Sample::new(
    ///     "PZ01",
    ///     Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
    ///     vec![
    ///         Parameter::new("pH", 7.2, "-").into(),
    ///         Parameter::new("Temperature", 11.4, "°C").into(),
    ///     ],
    /// );
    ///
    /// let ph_only = sample.filter_measurements(&["pH"]).unwrap();
    /// assert_eq!(ph_only.measurements.len(), 1);
    /// assert!(sample.filter_measurements(&["Salinity"]).is_none());
    /// ```
    pub fn filter_measurements(&self, parameters: &[&str]) -> Option<Sample> {
        let measurements: Vec<Measurement> = self
            .measurements
            .iter()
            .filter(|m| parameters.iter().any(|p| *p == m.parameter()))
            .cloned()
            .collect();

        if measurements.is_empty() {
            return None;
        }

        Some(Sample {
            measurements,
            ..self.clone()
        })
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample({}, {})", self.station, self.timestamp.to_rfc3339())
    }
}
