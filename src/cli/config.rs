//! Application configuration
//!
//! Loaded from a JSON file, then overridden from the environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `UBEERS_API_PORT` | `server.api_port` |
//! | `UBEERS_BRIDGE_PORT` | `server.bridge_port` |
//! | `UBEERS_API_BASE_URL` | `bridge.api_base_url` |
//! | `UBEERS_CORS_ORIGINS` | `server.cors_origins` (comma separated) |

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bridge::BridgeConfig;
use crate::http_server::ServerConfig;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub bridge: BridgeConfig,
}

impl AppConfig {
    /// Load configuration from file, apply environment overrides, validate.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = Self::read(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("UBEERS_API_PORT") {
            self.server.api_port = parse_port("UBEERS_API_PORT", &port)?;
        }
        if let Some(port) = lookup("UBEERS_BRIDGE_PORT") {
            self.server.bridge_port = parse_port("UBEERS_BRIDGE_PORT", &port)?;
        }
        if let Some(url) = lookup("UBEERS_API_BASE_URL") {
            self.bridge.api_base_url = url;
        }
        if let Some(origins) = lookup("UBEERS_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    pub fn validate(&self) -> CliResult<()> {
        self.server.validate().map_err(CliError::config_error)?;
        self.bridge.validate()?;
        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> CliResult<u16> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::config_error(format!("{} is not a valid port: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::read(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.server.api_port, 3099);
        assert_eq!(config.bridge.max_in_flight_lookups, 8);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server":{{"api_port":4000,"cors_origins":[]}},"bridge":{{"max_in_flight_lookups":2}}}}"#
        )
        .unwrap();

        let config = AppConfig::read(file.path()).unwrap();
        assert_eq!(config.server.api_port, 4000);
        assert_eq!(config.server.bridge_port, 3100);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.bridge.max_in_flight_lookups, 2);
        assert_eq!(config.bridge.outbound_buffer, 64);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = AppConfig::read(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "UBEERS_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[
                ("UBEERS_API_PORT", "5000"),
                ("UBEERS_BRIDGE_PORT", "5001"),
                ("UBEERS_API_BASE_URL", "http://api:5000"),
                ("UBEERS_CORS_ORIGINS", "http://a.example, http://b.example,"),
            ]))
            .unwrap();

        assert_eq!(config.server.api_port, 5000);
        assert_eq!(config.server.bridge_port, 5001);
        assert_eq!(config.bridge.api_base_url, "http://api:5000");
        assert_eq!(
            config.server.cors_origins,
            vec!["http://a.example", "http://b.example"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_port_override_rejected() {
        let mut config = AppConfig::default();
        assert!(config
            .apply_overrides(lookup(&[("UBEERS_API_PORT", "http")]))
            .is_err());
    }

    #[test]
    fn test_zero_cap_fails_validation() {
        let mut config = AppConfig::default();
        config.bridge.max_in_flight_lookups = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.code_str(), "UBEERS_CLI_CONFIG_ERROR");
    }
}
