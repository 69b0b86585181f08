use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::WatersyncClient;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

const PROJECT_ENDPOINT: &str = "base/projects";

/// A monitoring project. Most requests are scoped to one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        let response = client
            .request(PROJECT_ENDPOINT)
            .with_data(serde_json::to_value(self)?)
            .post()?
            .error_for_failure()?;
        info!("Project {} saved!", self.name);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_fields_are_dropped() -> Result<(), serde_json::Error> {
        let project = Project {
            start_date: NaiveDate::from_ymd_opt(2023, 4, 1),
            is_active: Some(true),
            ..Project::new("Vecht")
        };
        assert_eq!(
            serde_json::to_value(&project)?,
            json!({"name": "Vecht", "start_date": "2023-04-01", "is_active": true})
        );
        Ok(())
    }
}
