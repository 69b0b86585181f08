//! Client configuration loaded from a JSON file.
//!
//! ```json
//! {
//!   "base_url": "https://watersync.example.org/api",
//!   "project": "delta-monitoring",
//!   "endpoints": { "lists": { "units": "v2/base/units/" } }
//! }
//! ```
//!
//! Only `base_url` is required. Endpoints that are not listed keep their
//! defaults.

use crate::api::endpoints::Endpoints;
use crate::error::WaterspyError;
use crate::utils::get_config_path;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            project: None,
            endpoints: Endpoints::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, WaterspyError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| WaterspyError::ConfigRead(path.to_path_buf(), e))?;
        let config = serde_json::from_str(&raw)
            .map_err(|e| WaterspyError::ConfigParse(path.to_path_buf(), e))?;
        info!("Loaded client configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `waterspy/config.json` from the platform configuration directory
    /// (e.g. `~/.config/waterspy/config.json` on Linux).
    pub fn load_default() -> Result<Self, WaterspyError> {
        let path = get_config_path().ok_or(WaterspyError::ConfigDirResolution)?;
        Self::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints::ListTarget;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_partial_config() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"{{"base_url": "http://localhost:8000", "endpoints": {{"lists": {{"units": "v2/units/"}}}}}}"#
        )?;

        let config = ClientConfig::load(file.path())?;
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.project, None);
        assert_eq!(config.endpoints.list(ListTarget::Units), "v2/units/");
        assert_eq!(config.endpoints.login, "auth/token/login/");
        Ok(())
    }

    #[test]
    fn test_load_reports_the_failing_path() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{{ not json")?;

        match ClientConfig::load(file.path()) {
            Err(WaterspyError::ConfigParse(path, _)) => assert_eq!(path, file.path()),
            other => panic!("expected a parse error, got {other:?}"),
        }
        assert!(matches!(
            ClientConfig::load(Path::new("/definitely/not/here.json")),
            Err(WaterspyError::ConfigRead(_, _))
        ));
        Ok(())
    }
}
