//! Configuration service for `config show` and `config set`

use crate::AppError;
use crate::error::ConfigError;
use crate::storage::config::{Config, ENV_API_KEY, ENV_DB, ENV_URL};
use crate::utils::validation::{validate_api_key, validate_url};
use std::path::PathBuf;

/// Where an effective setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    Environment,
    File,
    Default,
}

impl SettingSource {
    pub fn label(&self) -> &'static str {
        match self {
            SettingSource::Environment => "env",
            SettingSource::File => "config file",
            SettingSource::Default => "default",
        }
    }
}

/// One row of `config show`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: SettingSource,
}

/// Configuration service for managing application configuration
pub struct ConfigService {
    config: Config,
}

impl ConfigService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set a user-facing field after validating the value
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        let value = value.trim();
        match field {
            "url" => {
                validate_url(value)?;
                self.config.set_base_url(value.trim_end_matches('/').to_string());
            }
            "api-key" => {
                validate_api_key(value)?;
                self.config.set_api_key(value.to_string());
            }
            "db" => {
                if value.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        value: value.to_string(),
                        reason: "path is empty".to_string(),
                    }
                    .into());
                }
                self.config.set_database_path(PathBuf::from(value));
            }
            _ => {
                return Err(ConfigError::UnknownField {
                    field: field.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_config(&self, path: Option<PathBuf>) -> Result<(), AppError> {
        self.config.save(path).map_err(|e| e.into())
    }

    /// Effective settings with their origin
    pub fn entries(&self) -> Vec<ConfigEntry> {
        self.entries_with(|name| std::env::var(name).ok().filter(|s| !s.trim().is_empty()))
    }

    fn entries_with(&self, env: impl Fn(&str) -> Option<String>) -> Vec<ConfigEntry> {
        let source = |var: &str, in_file: bool| {
            if env(var).is_some() {
                SettingSource::Environment
            } else if in_file {
                SettingSource::File
            } else {
                SettingSource::Default
            }
        };

        let settings = self.config.flow_settings();
        let flow_source = |set: bool| {
            if set {
                SettingSource::File
            } else {
                SettingSource::Default
            }
        };

        vec![
            ConfigEntry {
                key: "url",
                value: self.config.base_url_with(&env),
                source: source(ENV_URL, self.config.base_url.is_some()),
            },
            ConfigEntry {
                key: "api-key",
                value: self.config.api_key_with(&env),
                source: source(ENV_API_KEY, self.config.api_key.is_some()),
            },
            ConfigEntry {
                key: "db",
                value: self
                    .config
                    .database_path_with(&env)
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(in memory)".to_string()),
                source: source(ENV_DB, self.config.database_path.is_some()),
            },
            ConfigEntry {
                key: "initial-page-size",
                value: settings.initial_page_size.to_string(),
                source: flow_source(self.config.flow.initial_page_size.is_some()),
            },
            ConfigEntry {
                key: "load-more-size",
                value: settings.load_more_size.to_string(),
                source: flow_source(self.config.flow.load_more_size.is_some()),
            },
            ConfigEntry {
                key: "search-debounce-ms",
                value: settings.search_debounce.as_millis().to_string(),
                source: flow_source(self.config.flow.search_debounce_ms.is_some()),
            },
            ConfigEntry {
                key: "min-query-length",
                value: settings.min_query_length.to_string(),
                source: flow_source(self.config.flow.min_query_length.is_some()),
            },
        ]
    }
}
