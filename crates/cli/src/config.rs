use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use haven_session::SafeCoordMap;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// Path of the safe-coordinates lookup file.
    #[serde(default = "default_safecoords_path")]
    pub safecoords: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

fn default_safecoords_path() -> String {
    "safecoords.json".to_string()
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {path}"))?;
        serde_json::from_str(&raw).with_context(|| format!("cannot parse config file {path}"))
    }
}

/// Load the name -> coordinate-object lookup. A missing or malformed file
/// degrades to an empty lookup; the editor works without presets.
pub fn load_safecoords(path: &str) -> SafeCoordMap {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return SafeCoordMap::new(),
    };
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) => {
            warn!("safecoords file {path} is not a JSON object, ignoring");
            SafeCoordMap::new()
        }
        Err(e) => {
            warn!("cannot parse safecoords file {path}: {e}");
            SafeCoordMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_with_default_safecoords_path() {
        let config: AppConfig =
            serde_json::from_str(r#"{"database": {"path": "haven.db"}}"#).unwrap();
        assert_eq!(config.database.path, "haven.db");
        assert_eq!(config.safecoords, "safecoords.json");
    }

    #[test]
    fn missing_safecoords_file_yields_empty_lookup() {
        assert!(load_safecoords("/nonexistent/safecoords.json").is_empty());
    }
}
