//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::{GatewayError, DEFAULT_HOST, DEFAULT_PORT};

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Allow cross-origin requests
    pub cors: bool,

    /// Emit a tracing span per HTTP request
    pub request_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors: true,
            request_tracing: true,
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable CORS
    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| GatewayError::InvalidConfig(format!("{}:{}: {}", self.host, self.port, e)))
    }

    /// Load configuration from a JSON file; missing keys take defaults
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &str) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(config.cors);
    }

    #[test]
    fn test_config_builder() {
        let config = GatewayConfig::new()
            .with_host("0.0.0.0")
            .with_port(9090)
            .with_cors(false);

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:9090");
        assert!(!config.cors);
    }

    #[test]
    fn test_invalid_host_is_config_error() {
        let config = GatewayConfig::new().with_host("not a host");
        assert!(matches!(
            config.socket_addr(),
            Err(GatewayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let parsed: GatewayConfig = serde_json::from_str(r#"{"port": 5000}"#).unwrap();
        assert_eq!(parsed.port, 5000);
        assert_eq!(parsed.host, DEFAULT_HOST);
        assert!(parsed.request_tracing);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("resolutions-gateway-{}.json", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let config = GatewayConfig::new().with_port(7001);

        config.to_file(&path).unwrap();
        let loaded = GatewayConfig::from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
