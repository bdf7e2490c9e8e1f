//! HTTP Server Configuration
//!
//! Bind address, CORS origins and the release metadata reported by the
//! statistics endpoint.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Set origins from a comma separated list; `*` allows any origin
    pub fn set_cors_origins(&mut self, list: &str) {
        self.cors_origins = list
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty() && *o != "*")
            .map(str::to_string)
            .collect();
        if list.split(',').any(|o| o.trim() == "*") {
            self.cors_origins.clear();
        }
    }
}

/// Catalog release reported by `/statistics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_last_update")]
    pub last_update: String,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_last_update() -> String {
    "2025-06-08".to_string()
}

impl Default for ReleaseInfo {
    fn default() -> Self {
        Self {
            version: default_version(),
            last_update: default_last_update(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::with_port(9000);
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_cors_list() {
        let mut config = HttpServerConfig::default();
        config.set_cors_origins("https://a.example, https://b.example,");
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );

        config.set_cors_origins("https://a.example,*");
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_partial_release_info() {
        let release: ReleaseInfo = serde_json::from_str(r#"{"version": "2.1.0"}"#).unwrap();
        assert_eq!(release.version, "2.1.0");
        assert_eq!(release.last_update, "2025-06-08");
    }
}
