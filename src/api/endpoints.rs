//! The endpoint table of the WaterSync API.
//!
//! Logical resource names map to path fragments that are appended to the
//! client's base URL. The table is an immutable value: the defaults below are
//! used unless a [`crate::ClientConfig`] overrides some of them.

use crate::types::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lookup lists that can be fetched with [`crate::get_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListTarget {
    Institutions,
    Projects,
    Units,
    MeteoStations,
    SubirriLocations,
    WwtpStations,
    Piezometers,
    PiezometerMaterials,
    PiezometerConstructionTechniques,
    Loggers,
    LoggerModels,
    LoggerMeasurementTypes,
    WaterqualityParameters,
    WaterqualityAnalytes,
    WaterqualityMethods,
}

impl ListTarget {
    pub const ALL: [ListTarget; 15] = [
        ListTarget::Institutions,
        ListTarget::Projects,
        ListTarget::Units,
        ListTarget::MeteoStations,
        ListTarget::SubirriLocations,
        ListTarget::WwtpStations,
        ListTarget::Piezometers,
        ListTarget::PiezometerMaterials,
        ListTarget::PiezometerConstructionTechniques,
        ListTarget::Loggers,
        ListTarget::LoggerModels,
        ListTarget::LoggerMeasurementTypes,
        ListTarget::WaterqualityParameters,
        ListTarget::WaterqualityAnalytes,
        ListTarget::WaterqualityMethods,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ListTarget::Institutions => "institutions",
            ListTarget::Projects => "projects",
            ListTarget::Units => "units",
            ListTarget::MeteoStations => "meteo-stations",
            ListTarget::SubirriLocations => "subirri-locations",
            ListTarget::WwtpStations => "wwtp-stations",
            ListTarget::Piezometers => "piezometers",
            ListTarget::PiezometerMaterials => "piezometer-materials",
            ListTarget::PiezometerConstructionTechniques => "piezometer-construction-techniques",
            ListTarget::Loggers => "loggers",
            ListTarget::LoggerModels => "logger-models",
            ListTarget::LoggerMeasurementTypes => "logger-measurement-types",
            ListTarget::WaterqualityParameters => "waterquality-parameters",
            ListTarget::WaterqualityAnalytes => "waterquality-analytes",
            ListTarget::WaterqualityMethods => "waterquality-methods",
        }
    }

    fn default_path(&self) -> &'static str {
        match self {
            ListTarget::Institutions => "base/institutions/",
            ListTarget::Projects => "base/projects/",
            ListTarget::Units => "base/units/",
            ListTarget::MeteoStations => "meteo/station/",
            ListTarget::SubirriLocations => "subirri/location/",
            ListTarget::WwtpStations => "wwtp/station/",
            ListTarget::Piezometers => "groundwater/piezometers/",
            ListTarget::PiezometerMaterials => "groundwater/materials/",
            ListTarget::PiezometerConstructionTechniques => "groundwater/techniques/",
            ListTarget::Loggers => "logger/loggers/",
            ListTarget::LoggerModels => "logger/models/",
            ListTarget::LoggerMeasurementTypes => "logger/measurementtypes/",
            ListTarget::WaterqualityParameters => "waterquality/parameters/",
            ListTarget::WaterqualityAnalytes => "waterquality/analytes/",
            ListTarget::WaterqualityMethods => "waterquality/methods/",
        }
    }
}

impl fmt::Display for ListTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ListTarget {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListTarget::ALL
            .into_iter()
            .find(|target| target.key() == s)
            .ok_or_else(|| ModelError::InvalidListTarget(s.to_string()))
    }
}

/// Reference lists that accept new entries through [`crate::OptionEntry::upload`].
///
/// Each target knows the endpoint it posts to and the fields an entry is
/// expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionTarget {
    Units,
    Analytes,
    Parameters,
    AnalyticalTechniques,
    Methods,
    Institutions,
    PiezometerMaterials,
    DrillingTechniques,
    LoggerModels,
    LoggerMeasurementTypes,
    WaterqualityParameters,
    WaterqualityAnalytes,
    WaterqualityMethods,
}

impl OptionTarget {
    pub const ALL: [OptionTarget; 13] = [
        OptionTarget::Units,
        OptionTarget::Analytes,
        OptionTarget::Parameters,
        OptionTarget::AnalyticalTechniques,
        OptionTarget::Methods,
        OptionTarget::Institutions,
        OptionTarget::PiezometerMaterials,
        OptionTarget::DrillingTechniques,
        OptionTarget::LoggerModels,
        OptionTarget::LoggerMeasurementTypes,
        OptionTarget::WaterqualityParameters,
        OptionTarget::WaterqualityAnalytes,
        OptionTarget::WaterqualityMethods,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            OptionTarget::Units => "units",
            OptionTarget::Analytes => "analytes",
            OptionTarget::Parameters => "parameters",
            OptionTarget::AnalyticalTechniques => "analytical-techniques",
            OptionTarget::Methods => "methods",
            OptionTarget::Institutions => "institutions",
            OptionTarget::PiezometerMaterials => "piezometer-materials",
            OptionTarget::DrillingTechniques => "drilling-techniques",
            OptionTarget::LoggerModels => "logger-models",
            OptionTarget::LoggerMeasurementTypes => "logger-measurement-types",
            OptionTarget::WaterqualityParameters => "waterquality-parameters",
            OptionTarget::WaterqualityAnalytes => "waterquality-analytes",
            OptionTarget::WaterqualityMethods => "waterquality-methods",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            OptionTarget::Units => "base/units",
            OptionTarget::Analytes | OptionTarget::WaterqualityAnalytes => "waterquality/analytes",
            OptionTarget::Parameters | OptionTarget::WaterqualityParameters => {
                "waterquality/parameters"
            }
            OptionTarget::AnalyticalTechniques => "waterquality/techniques",
            OptionTarget::Methods | OptionTarget::WaterqualityMethods => "waterquality/methods",
            OptionTarget::Institutions => "base/institutions",
            OptionTarget::PiezometerMaterials => "groundwater/materials",
            OptionTarget::DrillingTechniques => "groundwater/techniques",
            OptionTarget::LoggerModels => "logger/models",
            OptionTarget::LoggerMeasurementTypes => "logger/measurementtypes",
        }
    }

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            OptionTarget::Units => &["unit"],
            OptionTarget::Analytes => &["analyte", "detail"],
            OptionTarget::Parameters | OptionTarget::WaterqualityParameters => &["parameter"],
            OptionTarget::AnalyticalTechniques => &["technique", "detail"],
            OptionTarget::Methods => &["method", "detail"],
            OptionTarget::Institutions => &["institution"],
            OptionTarget::PiezometerMaterials => &["material"],
            OptionTarget::DrillingTechniques => &["technique"],
            OptionTarget::LoggerModels => &["model", "manufacturer"],
            OptionTarget::LoggerMeasurementTypes => &["measurement_type"],
            OptionTarget::WaterqualityAnalytes => &["analyte"],
            OptionTarget::WaterqualityMethods => &["method"],
        }
    }
}

impl fmt::Display for OptionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for OptionTarget {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionTarget::ALL
            .into_iter()
            .find(|target| target.key() == s)
            .ok_or_else(|| ModelError::InvalidOptionTarget(s.to_string()))
    }
}

/// Path fragments for every resource the client talks to.
///
/// Deserializing accepts a partial table: missing entries keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Endpoints {
    pub login: String,
    pub groundwater_logger_measurements: String,
    pub groundwater_manual_measurements: String,
    pub meteo_logger_measurements: String,
    pub subirrigation_logger_records: String,
    pub lists: BTreeMap<ListTarget, String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "auth/token/login/".to_string(),
            groundwater_logger_measurements: "groundwater/loggerrecords/".to_string(),
            groundwater_manual_measurements: "groundwater/manualmeasurements/".to_string(),
            meteo_logger_measurements: "meteo/loggerrecords/".to_string(),
            subirrigation_logger_records: "subirri/loggerrecords/".to_string(),
            lists: ListTarget::ALL
                .into_iter()
                .map(|target| (target, target.default_path().to_string()))
                .collect(),
        }
    }
}

impl Endpoints {
    /// Endpoint of a lookup list, falling back to the built-in path when the
    /// table was loaded without it.
    pub fn list(&self, target: ListTarget) -> &str {
        self.lists
            .get(&target)
            .map(String::as_str)
            .unwrap_or_else(|| target.default_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_target_round_trips_through_key() {
        for target in ListTarget::ALL {
            assert_eq!(target.key().parse::<ListTarget>().unwrap(), target);
        }
        assert!("lakes".parse::<ListTarget>().is_err());
    }

    #[test]
    fn test_option_target_parsing() {
        assert_eq!(
            "drilling-techniques".parse::<OptionTarget>().unwrap(),
            OptionTarget::DrillingTechniques
        );
        let err = "bogus".parse::<OptionTarget>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid target specified: 'bogus'");
    }

    #[test]
    fn test_default_table() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.login, "auth/token/login/");
        assert_eq!(endpoints.list(ListTarget::Piezometers), "groundwater/piezometers/");
        assert_eq!(endpoints.lists.len(), ListTarget::ALL.len());
    }

    #[test]
    fn test_partial_table_keeps_defaults() -> Result<(), serde_json::Error> {
        let endpoints: Endpoints = serde_json::from_str(
            r#"{"login": "api/login/", "lists": {"units": "v2/units/"}}"#,
        )?;
        assert_eq!(endpoints.login, "api/login/");
        assert_eq!(endpoints.meteo_logger_measurements, "meteo/loggerrecords/");
        assert_eq!(endpoints.list(ListTarget::Units), "v2/units/");
        assert_eq!(endpoints.list(ListTarget::Loggers), "logger/loggers/");
        Ok(())
    }
}
