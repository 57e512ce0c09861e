//! Failure classification.
//!
//! Reduces any error raised by the networking or storage layers to a
//! [`FailureCategory`] and maps every category to one fixed [`UiMessage`].
//! This is the only place user-visible failure text is defined.

use crate::error::ApiError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt;

/// Matches "HTTP 404", "HTTP/1.1 503", "Status Code: 429" and bare codes
static HTTP_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(HTTP(?:/\d(?:\.\d)?)?\s*)?(\d{3})\b").expect("HTTP code pattern is valid")
});

const PARSING_TOKENS: &[&str] = &[
    "serialization",
    "deserializ",
    "json",
    "serde",
    "malformed",
    "unexpected token",
    "expected value",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    NoConnectivity,
    Timeout,
    /// Any 5xx status
    ServerError(u16),
    /// Any status outside the specially handled set
    ClientHttpError(u16),
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    MalformedResponse,
    Unknown,
}

impl FailureCategory {
    pub fn from_status(code: u16) -> Self {
        match code {
            401 => FailureCategory::Unauthorized,
            403 => FailureCategory::Forbidden,
            404 => FailureCategory::NotFound,
            429 => FailureCategory::RateLimited,
            500..=599 => FailureCategory::ServerError(code),
            _ => FailureCategory::ClientHttpError(code),
        }
    }

    /// Whether a retry action makes sense for this category
    pub fn is_retryable(&self) -> bool {
        self.user_message().action.is_some()
    }

    pub fn user_message(&self) -> UiMessage {
        to_user_message(*self)
    }
}

/// Title, body and optional action label shown for a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiMessage {
    pub title: &'static str,
    pub message: &'static str,
    pub action: Option<&'static str>,
}

impl UiMessage {
    pub const NO_RESULTS: UiMessage = UiMessage {
        title: "No results",
        message: "No results found",
        action: None,
    };

    pub const NO_TEAMS: UiMessage = UiMessage {
        title: "No teams",
        message: "No teams found for this league",
        action: None,
    };

    pub const NO_LEAGUES: UiMessage = UiMessage {
        title: "No leagues",
        message: "No leagues found for this sport",
        action: None,
    };

    pub const INVALID_QUERY: UiMessage = UiMessage {
        title: "Invalid search",
        message: "Please enter at least 3 characters",
        action: None,
    };

    pub const NO_FAVORITES: UiMessage = UiMessage {
        title: "No favorites yet",
        message: "Follow a team to see it here",
        action: None,
    };
}

impl fmt::Display for UiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message.replace('\n', " "))
    }
}

/// A raw error reduced to its category plus the precomputed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFailure {
    pub category: FailureCategory,
    pub ui: UiMessage,
    /// Original error text, kept for logging only
    pub detail: String,
}

impl ClassifiedFailure {
    pub fn from_category(category: FailureCategory) -> Self {
        Self {
            category,
            ui: to_user_message(category),
            detail: String::new(),
        }
    }

    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let category = classify(err);
        log::debug!("Classified failure as {:?}: {}", category, err);
        Self {
            category,
            ui: to_user_message(category),
            detail: err.to_string(),
        }
    }
}

impl<E> From<&E> for ClassifiedFailure
where
    E: Error + 'static,
{
    fn from(err: &E) -> Self {
        Self::from_error(err)
    }
}

/// Classify a failure into one of the fixed categories.
///
/// One level of cause chaining is unwrapped first. Known transport types are
/// mapped directly; everything else goes through status-code recovery and
/// finally a parsing-error heuristic.
pub fn classify(err: &(dyn Error + 'static)) -> FailureCategory {
    let cause = err.source().unwrap_or(err);

    for candidate in [cause, err] {
        if let Some(category) = transport_category(candidate) {
            return category;
        }
    }

    if let Some(code) = status_from_message(&cause.to_string()).or_else(|| status_from_accessor(cause))
    {
        return FailureCategory::from_status(code);
    }

    if looks_like_parsing_error(cause) {
        FailureCategory::MalformedResponse
    } else {
        FailureCategory::Unknown
    }
}

pub fn to_user_message(category: FailureCategory) -> UiMessage {
    match category {
        FailureCategory::NoConnectivity => UiMessage {
            title: "You're Offline",
            message: "Check your connection and try again.",
            action: Some("Try Again"),
        },
        FailureCategory::Timeout => UiMessage {
            title: "Request timed out",
            message: "That took longer than expected. Please try again.",
            action: Some("Retry"),
        },
        FailureCategory::ServerError(_) => UiMessage {
            title: "Failed to load data",
            message: "Something went wrong on our end.\nPlease try again.",
            action: Some("Retry"),
        },
        FailureCategory::RateLimited => UiMessage {
            title: "Too many requests",
            message: "Please wait a moment and try again.",
            action: Some("Retry"),
        },
        FailureCategory::Unauthorized => UiMessage {
            title: "Session expired",
            message: "Please sign in again to continue.",
            action: Some("Sign in"),
        },
        FailureCategory::Forbidden => UiMessage {
            title: "Access denied",
            message: "You don't have permission to view this.",
            action: None,
        },
        FailureCategory::NotFound => UiMessage {
            title: "Not found",
            message: "We couldn't find what you're looking for.",
            action: None,
        },
        FailureCategory::ClientHttpError(_) | FailureCategory::Unknown => UiMessage {
            title: "Failed to load data",
            message: "Something went wrong.\nPlease try again.",
            action: Some("Retry"),
        },
        FailureCategory::MalformedResponse => UiMessage {
            title: "Failed to load data",
            message: "We received an unexpected response.\nPlease try again.",
            action: Some("Retry"),
        },
    }
}

fn transport_category(err: &(dyn Error + 'static)) -> Option<FailureCategory> {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return match api {
            ApiError::Timeout { .. } => Some(FailureCategory::Timeout),
            ApiError::Network { .. } => Some(FailureCategory::NoConnectivity),
            ApiError::Decode { .. } => Some(FailureCategory::MalformedResponse),
            ApiError::Http { .. } | ApiError::Unauthorized { .. } => None,
        };
    }

    if let Some(req) = err.downcast_ref::<reqwest::Error>() {
        if req.is_timeout() {
            return Some(FailureCategory::Timeout);
        }
        if req.is_connect() || req.is_request() {
            return Some(FailureCategory::NoConnectivity);
        }
        if req.is_decode() {
            return Some(FailureCategory::MalformedResponse);
        }
        return None;
    }

    if let Some(io) = err.downcast_ref::<std::io::Error>() {
        return Some(match io.kind() {
            std::io::ErrorKind::TimedOut => FailureCategory::Timeout,
            _ => FailureCategory::NoConnectivity,
        });
    }

    if err.downcast_ref::<serde_json::Error>().is_some() {
        return Some(FailureCategory::MalformedResponse);
    }

    None
}

fn status_from_message(message: &str) -> Option<u16> {
    if message.trim().is_empty() {
        return None;
    }
    let captures = HTTP_CODE_PATTERN.captures(message)?;
    let code = captures.get(2)?.as_str().parse::<u16>().ok()?;
    (100..=599).contains(&code).then_some(code)
}

// Types that expose a status accessor
fn status_from_accessor(err: &(dyn Error + 'static)) -> Option<u16> {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return api.status();
    }
    if let Some(req) = err.downcast_ref::<reqwest::Error>() {
        return req.status().map(|s| s.as_u16());
    }
    None
}

fn looks_like_parsing_error(err: &(dyn Error + 'static)) -> bool {
    let message = err.to_string().to_lowercase();
    let debug = format!("{:?}", err).to_lowercase();

    PARSING_TOKENS
        .iter()
        .any(|token| message.contains(token) || debug.contains(token))
}
