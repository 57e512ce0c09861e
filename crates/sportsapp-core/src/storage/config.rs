//! Configuration management
//!
//! Priority: CLI argument > environment variable > config.toml > built-in default.
//! CLI arguments are applied by the caller; everything else is resolved here.

use super::Result;
use crate::api::client::{DEFAULT_API_KEY, DEFAULT_BASE_URL};
use crate::core::flows::FlowSettings;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_URL: &str = "SPORTSAPP_URL";
pub const ENV_API_KEY: &str = "SPORTSAPP_API_KEY";
pub const ENV_DB: &str = "SPORTSAPP_DB";

const APP_DIR: &str = "sportsapp";
const CONFIG_FILE: &str = "config.toml";

/// Optional overrides for the flow tunables
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowConfig {
    pub initial_page_size: Option<usize>,
    pub load_more_size: Option<usize>,
    pub search_debounce_ms: Option<u64>,
    pub min_query_length: Option<usize>,
}

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// TheSportsDB server URL
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Favorites database file
    pub database_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "is_default_flow")]
    pub flow: FlowConfig,
}

fn is_default_flow(flow: &FlowConfig) -> bool {
    *flow == FlowConfig::default()
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join(APP_DIR).join(CONFIG_FILE))
    }

    /// Base URL with fallback to environment variable, then the public server
    pub fn get_base_url(&self) -> String {
        self.base_url_with(env_var)
    }

    /// API key with fallback to environment variable, then the free-tier key
    pub fn get_api_key(&self) -> String {
        self.api_key_with(env_var)
    }

    /// Favorites database path; `None` when no data directory exists
    pub fn get_database_path(&self) -> Option<PathBuf> {
        self.database_path_with(env_var)
    }

    pub(crate) fn base_url_with(&self, env: impl Fn(&str) -> Option<String>) -> String {
        env(ENV_URL)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub(crate) fn api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> String {
        env(ENV_API_KEY)
            .or_else(|| self.api_key.clone())
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string())
    }

    pub(crate) fn database_path_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        env(ENV_DB)
            .map(PathBuf::from)
            .or_else(|| self.database_path.clone())
            .or_else(crate::storage::favorites::default_db_path)
    }

    pub fn set_base_url(&mut self, url: String) {
        self.base_url = Some(url);
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_database_path(&mut self, path: PathBuf) {
        self.database_path = Some(path);
    }

    /// Flow tunables with unset or zero values replaced by defaults
    pub fn flow_settings(&self) -> FlowSettings {
        let defaults = FlowSettings::default();
        let positive = |v: Option<usize>, default: usize| v.filter(|n| *n > 0).unwrap_or(default);

        FlowSettings {
            initial_page_size: positive(self.flow.initial_page_size, defaults.initial_page_size),
            load_more_size: positive(self.flow.load_more_size, defaults.load_more_size),
            search_debounce: self
                .flow
                .search_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
            min_query_length: positive(self.flow.min_query_length, defaults.min_query_length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.base_url.is_none());
        assert_eq!(config.base_url_with(no_env), "https://www.thesportsdb.com");
        assert_eq!(config.api_key_with(no_env), "3");
        assert_eq!(config.flow_settings(), FlowSettings::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.set_base_url("http://file.test".to_string());
        config.set_api_key("filekey".to_string());

        let env = |name: &str| match name {
            ENV_URL => Some("http://env.test".to_string()),
            _ => None,
        };
        assert_eq!(config.base_url_with(env), "http://env.test");
        assert_eq!(config.api_key_with(env), "filekey");
    }

    #[test]
    fn test_database_path_priority() {
        let mut config = Config::default();
        config.set_database_path(PathBuf::from("/tmp/file.sqlite"));
        assert_eq!(
            config.database_path_with(no_env),
            Some(PathBuf::from("/tmp/file.sqlite"))
        );

        let env = |name: &str| (name == ENV_DB).then(|| "/tmp/env.sqlite".to_string());
        assert_eq!(
            config.database_path_with(env),
            Some(PathBuf::from("/tmp/env.sqlite"))
        );
    }

    #[test]
    fn test_flow_settings_from_file() {
        let config: Config = toml::from_str(
            r#"
            base_url = "http://example.test"

            [flow]
            initial_page_size = 8
            load_more_size = 8
            search_debounce_ms = 500
            min_query_length = 0
            "#,
        )
        .expect("valid config");

        let settings = config.flow_settings();
        assert_eq!(settings.initial_page_size, 8);
        assert_eq!(settings.load_more_size, 8);
        assert_eq!(settings.search_debounce, Duration::from_millis(500));
        // Zero falls back to the default
        assert_eq!(settings.min_query_length, 3);
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_base_url("http://example.test".to_string());
        config.set_api_key("123".to_string());
        config.flow.initial_page_size = Some(8);

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");
        let loaded = Config::load(Some(config_path)).expect("Failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load(Some(temp_dir.path().join("nonexistent.toml")))
            .expect("Failed to load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "base_url = [").expect("write config");

        assert!(matches!(
            Config::load(Some(path)),
            Err(StorageError::ConfigParseError { .. })
        ));
    }
}
