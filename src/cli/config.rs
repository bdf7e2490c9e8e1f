//! Service configuration
//!
//! Loaded from a JSON file (a missing file means all defaults), then
//! overridden from the environment, then validated.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::executor::DEFAULT_ID_BATCH_SIZE;
use crate::http_server::{HttpServerConfig, ReleaseInfo, DEFAULT_EXPORT_PAGE_SIZE};

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file, opened read-only in practice
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Pool ceiling; requests beyond it wait for a connection
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "marinenp-sqlite.db".to_string()
}

fn default_max_connections() -> u32 {
    100
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_id_batch_size")]
    pub id_batch_size: usize,
}

fn default_id_batch_size() -> usize {
    DEFAULT_ID_BATCH_SIZE
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            id_batch_size: default_id_batch_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_page_size")]
    pub page_size: u64,
}

fn default_export_page_size() -> u64 {
    DEFAULT_EXPORT_PAGE_SIZE
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_size: default_export_page_size(),
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub release: ReleaseInfo,
}

impl Config {
    /// Load configuration from file and process environment
    pub fn load(path: &Path) -> CliResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load configuration from file with overrides taken from `lookup`
    pub fn load_with<F>(path: &Path, lookup: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(CliError::config_error(format!(
                    "Failed to read config {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> CliResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Apply `PORT`, `DB_PATH`, `DB_MAX_CONNECTIONS`, `CORS_ALLOW_ORIGIN`,
    /// `APP_VERSION` and `LAST_UPDATE` from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(path) = lookup("DB_PATH") {
            self.database.path = path;
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("DB_MAX_CONNECTIONS", &max)?;
        }
        if let Some(origins) = lookup("CORS_ALLOW_ORIGIN") {
            self.server.set_cors_origins(&origins);
        }
        if let Some(version) = lookup("APP_VERSION") {
            self.release.version = version;
        }
        if let Some(last_update) = lookup("LAST_UPDATE") {
            self.release.last_update = last_update;
        }
        Ok(())
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }
        if self.database.max_connections == 0 {
            return Err(CliError::config_error(
                "database.max_connections must be > 0",
            ));
        }
        if self.analytics.id_batch_size == 0 {
            return Err(CliError::config_error(
                "analytics.id_batch_size must be > 0",
            ));
        }
        if self.export.page_size == 0 {
            return Err(CliError::config_error("export.page_size must be > 0"));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> CliResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::config_error(format!("Invalid {}: '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "marinenp-sqlite.db");
        assert_eq!(config.database.max_connections, 100);
        assert_eq!(config.analytics.id_batch_size, 10_000);
        assert_eq!(config.export.page_size, 50_000);
        assert_eq!(config.release.version, "1.0.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"port": 9001}}, "database": {{"path": "/data/np.db"}}, "analytics": {{"id_batch_size": 500}}}}"#
        )
        .unwrap();

        let config = Config::load_with(file.path(), env(&[])).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.database.path, "/data/np.db");
        assert_eq!(config.analytics.id_batch_size, 500);
        assert_eq!(config.export.page_size, 50_000);
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_with(&dir.path().join("absent.json"), env(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = Config::from_json("{not json").unwrap_err();
        assert_eq!(err.code_str(), "MNP_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("PORT", "9100"),
                ("DB_PATH", "/srv/marine.db"),
                ("DB_MAX_CONNECTIONS", "8"),
                ("CORS_ALLOW_ORIGIN", "https://a.example,https://b.example"),
                ("APP_VERSION", "1.2.0"),
                ("LAST_UPDATE", "2026-01-01"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.database.path, "/srv/marine.db");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.server.cors_origins.len(), 2);
        assert_eq!(config.release.version, "1.2.0");
        assert_eq!(config.release.last_update, "2026-01-01");
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = Config::default();
        let err = config.apply_overrides(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.message().contains("PORT"));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.analytics.id_batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.export.page_size = 0;
        assert!(config.validate().is_err());
    }
}
