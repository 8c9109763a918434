//! Bridge Configuration
//!
//! Passed explicitly to the bridge at construction.

use serde::{Deserialize, Serialize};

use super::errors::{BridgeError, BridgeResult};

/// Aggregation bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the resource API (default: "http://127.0.0.1:3099")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Picture lookups in flight per aggregation (default: 8)
    #[serde(default = "default_max_in_flight_lookups")]
    pub max_in_flight_lookups: usize,

    /// Replies queued per session before senders wait (default: 64)
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:3099".to_string()
}

fn default_max_in_flight_lookups() -> usize {
    8
}

fn default_outbound_buffer() -> usize {
    64
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            max_in_flight_lookups: default_max_in_flight_lookups(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

impl BridgeConfig {
    /// Create a config pointing at the given resource API
    pub fn with_api_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> BridgeResult<()> {
        if self.max_in_flight_lookups == 0 {
            return Err(BridgeError::Config(
                "max_in_flight_lookups must be at least 1".to_string(),
            ));
        }
        if self.outbound_buffer == 0 {
            return Err(BridgeError::Config(
                "outbound_buffer must be at least 1".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            BridgeError::Config(format!("invalid api_base_url {}: {}", self.api_base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BridgeError::Config(format!(
                "api_base_url must be http or https, got {}",
                url.scheme()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:3099");
        assert_eq!(config.max_in_flight_lookups, 8);
        assert_eq!(config.outbound_buffer, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"api_base_url":"http://api:3099"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://api:3099");
        assert_eq!(config.max_in_flight_lookups, 8);
    }

    #[test]
    fn test_zero_cap_rejected() {
        let config = BridgeConfig {
            max_in_flight_lookups: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_bad_url_rejected() {
        assert!(BridgeConfig::with_api_base_url("not a url").validate().is_err());
        assert!(BridgeConfig::with_api_base_url("ftp://host").validate().is_err());
        assert!(BridgeConfig::with_api_base_url("https://api.example.com")
            .validate()
            .is_ok());
    }
}
