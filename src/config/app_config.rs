// ==========================================
// FleetFlow - Application configuration
// ==========================================
// Resolution order: defaults -> JSON file -> environment
//   FLEETFLOW_CONFIG   path of the JSON file (optional)
//   FLEETFLOW_DB_PATH  overrides db_path
// ==========================================

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "FLEETFLOW_CONFIG";
pub const DB_PATH_ENV: &str = "FLEETFLOW_DB_PATH";

const DB_FILE_NAME: &str = "fleet_flow.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: String,
    pub busy_timeout_ms: u64,
    /// EnvFilter directive used when RUST_LOG is unset
    pub log_filter: String,
    /// Operators farther than this are left out of rankings
    pub operator_search_radius_km: Option<f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_filter: "info".to_string(),
            operator_search_radius_km: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then `$FLEETFLOW_CONFIG` if set, then env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Self::load_from(file.as_deref().map(Path::new))
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                self.db_path = trimmed.to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "db_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "busy_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(radius) = self.operator_search_radius_km {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "operator_search_radius_km",
                    reason: format!("must be a positive distance, got {}", radius),
                });
            }
        }
        Ok(())
    }
}

/// `<data dir>/fleet-flow/fleet_flow.db`, or the working directory when
/// no data dir is known. Debug builds use a separate `-dev` directory.
pub fn default_db_path() -> String {
    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("fleet-flow-dev");
        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("fleet-flow");

        path = dir.join(DB_FILE_NAME);
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.db_path.ends_with(DB_FILE_NAME));
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"busy_timeout_ms": 250, "operator_search_radius_km": 80.0}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.operator_search_radius_km, Some(80.0));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = AppConfig {
            operator_search_radius_km: Some(-1.0),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "operator_search_radius_km", .. })
        ));

        let config = AppConfig {
            busy_timeout_ms: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
