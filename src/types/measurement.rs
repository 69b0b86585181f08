//! Single water-quality results: field parameters and laboratory analytes.

use crate::types::kinds::SampleKind;
use serde::{Deserialize, Serialize};

const MICROGRAM_PER_LITRE: [&str; 2] = ["\u{00B5}g/L", "\u{03BC}g/L"];
const MOLAR_MASS_HCO3: f64 = 61.0;
const DETECTION_LIMIT_SENTINELS: [f64; 2] = [9999.0, -9999.0];

/// Returns `0.0` for the out-of-range sentinels `9999` and `-9999` that mark
/// a result below the detection limit.
pub fn handle_if_below_detection_limit(value: f64) -> f64 {
    if DETECTION_LIMIT_SENTINELS.contains(&value) {
        0.0
    } else {
        value
    }
}

/// Converts alkalinity in µM into HCO3- concentration in mg/L.
pub fn alkalinity_to_hco3(alkalinity: f64) -> f64 {
    alkalinity * MOLAR_MASS_HCO3
}

/// A field parameter such as pH or temperature. To be accepted by the API the
/// parameter has to be on the project's parameter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub value: f64,
    pub unit: String,
    pub parameter: String,
}

impl Parameter {
    pub fn new(parameter: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            parameter: parameter.into(),
        }
    }
}

/// A laboratory analyte such as nitrate or dissolved arsenic.
///
/// Values are normalized on construction:
///
/// * the detection-limit sentinels `9999` / `-9999` become `0`;
/// * `µg/L` becomes `mg/L` (value divided by 1000);
/// * `Alkalinity` in µM becomes `HCO3` in mg/L (value times 61.0).
///
/// The analyte name is sent to the API under the key `analyte`; when reading,
/// both `analyte` and `parameter` are accepted.
///
/// # Examples
///
/// ```
/// use waterspy::Analyte;
///
/// let arsenic = Analyte::new("Diss. As", 500.0, "µg/L");
/// assert_eq!(arsenic.unit, "mg/L");
/// assert_eq!(arsenic.value, 0.5);
///
/// let alkalinity = Analyte::new("Alkalinity", 2.0, "µM");
/// assert_eq!(alkalinity.parameter, "HCO3");
/// assert_eq!(alkalinity.value, 122.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAnalyte")]
pub struct Analyte {
    pub value: f64,
    pub unit: String,
    #[serde(rename = "analyte")]
    pub parameter: String,
}

#[derive(Deserialize)]
struct RawAnalyte {
    value: f64,
    unit: String,
    #[serde(alias = "analyte")]
    parameter: String,
}

impl From<RawAnalyte> for Analyte {
    fn from(raw: RawAnalyte) -> Self {
        Analyte::new(raw.parameter, raw.value, raw.unit)
    }
}

impl Analyte {
    pub fn new(parameter: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        let raw_value = handle_if_below_detection_limit(value);
        let mut parameter = parameter.into();
        let mut unit = unit.into();
        let mut value = raw_value;

        if MICROGRAM_PER_LITRE.contains(&unit.as_str()) {
            value = raw_value / 1000.0;
            unit = "mg/L".to_string();
        }

        if parameter == "Alkalinity" {
            value = alkalinity_to_hco3(raw_value);
            parameter = "HCO3".to_string();
            unit = "mg/L".to_string();
        }

        Self {
            value,
            unit,
            parameter,
        }
    }
}

/// Either kind of water-quality result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measurement {
    Parameter(Parameter),
    Analyte(Analyte),
}

impl Measurement {
    /// Builds the measurement type matching `kind`, applying analyte
    /// normalization where it applies.
    pub fn new(kind: SampleKind, parameter: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        match kind {
            SampleKind::Parameters => Parameter::new(parameter, value, unit).into(),
            SampleKind::Analytes => Analyte::new(parameter, value, unit).into(),
        }
    }

    pub fn parameter(&self) -> &str {
        match self {
            Measurement::Parameter(p) => &p.parameter,
            Measurement::Analyte(a) => &a.parameter,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Measurement::Parameter(p) => p.value,
            Measurement::Analyte(a) => a.value,
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            Measurement::Parameter(p) => &p.unit,
            Measurement::Analyte(a) => &a.unit,
        }
    }

    pub fn kind(&self) -> SampleKind {
        match self {
            Measurement::Parameter(_) => SampleKind::Parameters,
            Measurement::Analyte(_) => SampleKind::Analytes,
        }
    }
}

impl From<Parameter> for Measurement {
    fn from(parameter: Parameter) -> Self {
        Measurement::Parameter(parameter)
    }
}

impl From<Analyte> for Measurement {
    fn from(analyte: Analyte) -> Self {
        Measurement::Analyte(analyte)
    }
}
