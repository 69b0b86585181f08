//! Enumerations shared by the water-quality models: what a sample measures
//! and which water body it was taken from.

use crate::types::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether samples carry field parameters (pH, temperature, ...) or
/// laboratory analytes (nitrate, dissolved metals, ...).
///
/// Analytical samples are additionally identified by the analytical method.
///
/// # Examples
///
/// ```
/// use waterspy::SampleKind;
///
/// assert_eq!("analysis".parse::<SampleKind>().unwrap(), SampleKind::Analytes);
/// assert_eq!(SampleKind::Parameters.to_string(), "parameters");
/// assert!("isotopes".parse::<SampleKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Parameters,
    Analytes,
}

impl SampleKind {
    pub fn key(&self) -> &'static str {
        match self {
            SampleKind::Parameters => "parameters",
            SampleKind::Analytes => "analytes",
        }
    }

    /// Endpoint the samples of this kind are read from and posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            SampleKind::Parameters => "waterquality/parametersamples/",
            SampleKind::Analytes => "waterquality/analyticalsamples/",
        }
    }

    /// Columns identifying one sampling event in a flat measurement table.
    pub(crate) fn event_columns(&self) -> &'static [&'static str] {
        match self {
            SampleKind::Parameters => &["station", "timestamp", "institution"],
            SampleKind::Analytes => &["station", "timestamp", "institution", "method"],
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SampleKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parameters" => Ok(SampleKind::Parameters),
            "analytes" | "analysis" => Ok(SampleKind::Analytes),
            other => Err(ModelError::InvalidSampleKind(other.to_string())),
        }
    }
}

/// The water body a sample was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    Groundwater,
    Wastewater,
    Surfacewater,
}

impl SampleType {
    pub fn key(&self) -> &'static str {
        match self {
            SampleType::Groundwater => "groundwater",
            SampleType::Wastewater => "wastewater",
            SampleType::Surfacewater => "surfacewater",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SampleType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groundwater" => Ok(SampleType::Groundwater),
            "wastewater" => Ok(SampleType::Wastewater),
            "surfacewater" => Ok(SampleType::Surfacewater),
            other => Err(ModelError::InvalidSampleType(other.to_string())),
        }
    }
}
