use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub farm_base_url: String,
    pub analysis_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/map".into(),
            timeout_secs: 30,
            farm_base_url: "http://localhost:8000/farm-analysis".into(),
            analysis_url: "http://localhost:8000/analyze/".into(),
        }
    }
}

impl ServiceConfig {
    #[inline] pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub fit_padding: f64,           // Pixels around fitted bounds
    pub known_states: Vec<String>,  // Click targets before any state list is loaded
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fit_padding: 20.0,
            known_states: vec!["Punjab".into(), "Haryana".into(), "Uttar Pradesh".into()],
        }
    }
}

/// Session configuration. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub view: ViewConfig,
    pub attribute: Option<String>,
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("[config] Invalid configuration JSON")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("[config] Failed to load {}", path.display()))
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config = Config::from_json_str(r#"{"view": {"fit_padding": 5}, "attribute": "ph"}"#).unwrap();
        assert_eq!(config.view.fit_padding, 5.0);
        assert_eq!(config.view.known_states.len(), 3);
        assert_eq!(config.service.base_url, "http://localhost:8000/map");
        assert_eq!(config.attribute.as_deref(), Some("ph"));
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geodrill.json");
        std::fs::write(&path, r#"{"service": {"timeout_secs": 3}}"#).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().service.timeout(), Duration::from_secs(3));
        assert!(Config::from_json_str("[").is_err());
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
