//! Field loggers and their deployments at stations.

use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::WatersyncClient;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const LOGGER_ENDPOINT: &str = "logger/loggers";
const DEPLOYMENT_ENDPOINT: &str = "groundwater/loggerdeployment";

/// An instrument that records measurements autonomously, identified by its
/// serial number.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Logger {
    pub identifier: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub logger_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_type: Option<Vec<String>>,
    /// Nested model description, e.g. `{"model": "Diver", "manufacturer": "Van Essen"}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Logger {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    /// Registers the logger. The endpoint takes a list, so the payload is a
    /// single-element array.
    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        let response = client
            .request(LOGGER_ENDPOINT)
            .with_data(Value::Array(vec![serde_json::to_value(self)?]))
            .post()?
            .error_for_failure()?;
        info!("Logger with sn {} saved!", self.identifier);
        Ok(response)
    }
}

/// Installation of a logger at a station for a period of time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoggerDeployment {
    pub logger: String,
    pub station: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decommissioned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_type: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iot: Option<bool>,
    /// Altitude of the logger sensor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger_altitude: Option<f64>,
    /// Length of the cable the logger hangs from, measured from the top of casing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rope_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl LoggerDeployment {
    pub fn new(logger: impl Into<String>, station: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            station: station.into(),
            ..Default::default()
        }
    }

    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        let response = client
            .request(DEPLOYMENT_ENDPOINT)
            .with_data(Value::Array(vec![serde_json::to_value(self)?]))
            .post()?
            .error_for_failure()?;
        info!("Logger {} deployed at {}", self.logger, self.station);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_logger_payload_uses_type_key() -> Result<(), serde_json::Error> {
        let logger = Logger {
            logger_type: Some("pressure".to_string()),
            available: Some(true),
            measurement_type: Some(vec!["pressure".to_string(), "temperature".to_string()]),
            ..Logger::new("AB123")
        };
        assert_eq!(
            serde_json::to_value(&logger)?,
            json!({
                "identifier": "AB123",
                "type": "pressure",
                "available": true,
                "measurement_type": ["pressure", "temperature"]
            })
        );
        Ok(())
    }

    #[test]
    fn test_deployment_payload() -> Result<(), serde_json::Error> {
        let deployment = LoggerDeployment {
            deployed_at: Some(Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap()),
            rope_length: Some(12.5),
            ..LoggerDeployment::new("AB123", "PZ01")
        };
        assert_eq!(
            serde_json::to_value(&deployment)?,
            json!({
                "logger": "AB123",
                "station": "PZ01",
                "deployed_at": "2024-05-02T10:00:00Z",
                "rope_length": 12.5
            })
        );
        Ok(())
    }
}
