use crate::api::endpoints::OptionTarget;
use crate::api::error::ApiError;
use crate::api::response::WaterResponse;
use crate::client::WatersyncClient;
use log::info;
use serde_json::{Map, Value};

/// A new row for one of the lookup tables (units, methods, logger models, ...).
///
/// The object is sent as-is; [`OptionTarget::fields`] lists the keys the
/// table expects.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    pub target: OptionTarget,
    pub object: Map<String, Value>,
}

impl OptionEntry {
    pub fn new(target: OptionTarget, object: Map<String, Value>) -> Self {
        Self { target, object }
    }

    /// Keys the target table expects that are absent from the object.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.target
            .fields()
            .iter()
            .copied()
            .filter(|field| !self.object.contains_key(*field))
            .collect()
    }

    pub fn upload(&self, client: &WatersyncClient) -> Result<WaterResponse, ApiError> {
        let response = client
            .request(self.target.endpoint())
            .with_data(Value::Object(self.object.clone()))
            .post()?
            .error_for_failure()?;
        info!("Option {} saved to {}", Value::Object(self.object.clone()), self.target);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields() {
        let Value::Object(object) = json!({"model": "Diver"}) else {
            unreachable!()
        };
        let entry = OptionEntry::new(OptionTarget::LoggerModels, object);
        assert_eq!(entry.missing_fields(), vec!["manufacturer"]);
    }
}
