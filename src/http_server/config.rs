//! HTTP Server Configuration
//!
//! Bind addresses and the origin allow-list for both servers.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Configuration shared by the API and bridge servers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Resource API port (default: 3099)
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Bridge port (default: 3100)
    #[serde(default = "default_bridge_port")]
    pub bridge_port: u16,

    /// Allowed origins; empty allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    3099
}

fn default_bridge_port() -> u16 {
    3100
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:4200".to_string(), // Angular dev server
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_port: default_api_port(),
            bridge_port: default_bridge_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    /// Address string for the resource API
    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.host, self.api_port)
    }

    /// Address string for the bridge
    pub fn bridge_addr(&self) -> String {
        format!("{}:{}", self.host, self.bridge_port)
    }

    /// Check that both bind addresses parse
    pub fn validate(&self) -> Result<(), String> {
        for addr in [self.api_addr(), self.bridge_addr()] {
            addr.parse::<SocketAddr>()
                .map_err(|e| format!("invalid bind address {}: {}", addr, e))?;
        }
        if self.api_port != 0 && self.api_port == self.bridge_port {
            return Err(format!(
                "api_port and bridge_port must differ (both {})",
                self.api_port
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.api_port, 3099);
        assert_eq!(config.bridge_port, 3100);
        assert_eq!(config.cors_origins, vec!["http://localhost:4200"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_addrs() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_addr(), "127.0.0.1:3099");
        assert_eq!(config.bridge_addr(), "127.0.0.1:3100");
    }

    #[test]
    fn test_bad_host_rejected() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_same_port_rejected() {
        let config = ServerConfig {
            api_port: 4000,
            bridge_port: 4000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
