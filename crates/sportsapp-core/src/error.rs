use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Team not found: {name}")]
    TeamNotFound { name: String },
    /// Already shown to the user as a classified failure
    #[error("{0}")]
    Reported(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("Network unreachable: {message}")]
    Network { endpoint: String, message: String },
    #[error("HTTP {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("HTTP {status} Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
    #[error("Malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Unauthorized { status, .. } => {
                Some(*status).filter(|s| *s != 0)
            }
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Timeout { endpoint, .. }
            | ApiError::Network { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Unauthorized { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Favorites database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Favorites store task failed: {message}")]
    Task { message: String },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown configuration field '{field}'")]
    UnknownField { field: String },
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Search query must be at least {min_len} characters")]
    QueryTooShort { min_len: usize },
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Invalid API key: {reason}")]
    InvalidApiKey { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } | ApiError::Network { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(StorageError::Database(_)) => ErrorSeverity::Critical,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Validation(_) => ErrorSeverity::Low,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Timeout { .. } | ApiError::Network { .. }) => {
                Some("Check your internet connection and try again".to_string())
            }
            AppError::Api(ApiError::Unauthorized { .. }) => Some(
                "Check SPORTSAPP_API_KEY or 'sportsapp config set --api-key <key>'".to_string(),
            ),
            AppError::Storage(StorageError::Database(_)) => Some(
                "The favorites database may be corrupt; point SPORTSAPP_DB at a new file"
                    .to_string(),
            ),
            AppError::Cli(CliError::TeamNotFound { .. }) => {
                Some("'sportsapp search <query>' to find the exact team name".to_string())
            }
            AppError::Config(ConfigError::UnknownField { .. }) => {
                Some("Settable fields are 'url', 'api-key' and 'db'".to_string())
            }
            AppError::Validation(ValidationError::QueryTooShort { .. }) => {
                Some("Type a longer team name".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_api_error_display() {
        let api_err = ApiError::Http {
            status: 404,
            endpoint: "/searchteams.php".to_string(),
            message: "Not Found".to_string(),
        };
        assert_eq!(format!("{}", api_err), "HTTP 404 Not Found");
        assert_eq!(api_err.status(), Some(404));
        assert_eq!(api_err.endpoint(), "/searchteams.php");

        let api_err = ApiError::Timeout {
            timeout_secs: 30,
            endpoint: "endpoint".to_string(),
        };
        assert_eq!(format!("{}", api_err), "Request timed out after 30s");
        assert!(api_err.status().is_none());
    }

    #[test]
    fn test_status_zero_is_not_a_status() {
        let api_err = ApiError::Http {
            status: 0,
            endpoint: "client_init".to_string(),
            message: "builder error".to_string(),
        };
        assert!(api_err.status().is_none());
    }

    #[test]
    fn test_app_error_source_is_inner_error() {
        let app_err = AppError::Api(ApiError::Network {
            endpoint: "/all_leagues.php".to_string(),
            message: "dns error".to_string(),
        });
        let source = app_err.source().expect("AppError::Api should expose a source");
        assert!(source.downcast_ref::<ApiError>().is_some());
    }

    #[test]
    fn test_severity_levels() {
        let app_err = AppError::Api(ApiError::Http {
            status: 503,
            endpoint: "endpoint".to_string(),
            message: "unavailable".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::High);

        let app_err = AppError::Validation(ValidationError::QueryTooShort { min_len: 3 });
        assert_eq!(app_err.severity(), ErrorSeverity::Low);
        assert_eq!(
            format!("{}", app_err),
            "ValidationError: Search query must be at least 3 characters"
        );
    }

    #[test]
    fn test_troubleshooting_hints() {
        let app_err = AppError::Cli(CliError::TeamNotFound {
            name: "Arsenal".to_string(),
        });
        assert!(app_err.troubleshooting_hint().is_some());

        let app_err = AppError::Config(ConfigError::InvalidValue {
            field: "db".to_string(),
            value: String::new(),
            reason: "path is empty".to_string(),
        });
        assert!(app_err.troubleshooting_hint().is_none());
        assert_eq!(
            format!("{}", app_err),
            "ConfigError: Invalid configuration value for 'db': path is empty"
        );
    }
}
