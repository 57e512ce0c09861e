//! Input validation for search queries and configuration values.

use crate::error::ValidationError;

/// A trimmed query long enough to be worth a request
pub fn is_valid_search_query(query: &str, min_len: usize) -> bool {
    query.trim().chars().count() >= min_len
}

/// Reject queries below `min_len` characters after trimming
pub fn validate_search_query(query: &str, min_len: usize) -> crate::Result<()> {
    if is_valid_search_query(query, min_len) {
        Ok(())
    } else {
        Err(ValidationError::QueryTooShort { min_len }.into())
    }
}

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: "URL cannot be empty".to_string(),
        }
        .into());
    }

    // Must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: "URL must start with http:// or https://".to_string(),
        }
        .into());
    }

    Ok(())
}

/// API keys become a path segment, so they must be non-empty and slash-free
pub fn validate_api_key(api_key: &str) -> crate::Result<()> {
    if api_key.trim().is_empty() {
        return Err(ValidationError::InvalidApiKey {
            reason: "API key cannot be empty".to_string(),
        }
        .into());
    }

    if api_key.contains(['/', '?', '#']) || api_key.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidApiKey {
            reason: "API key must not contain '/', '?', '#' or whitespace".to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_search_query_length_counts_trimmed_chars() {
        assert!(is_valid_search_query("ars", 3));
        assert!(!is_valid_search_query("  ar  ", 3));
        assert!(is_valid_search_query("Köln", 4));
        assert!(!is_valid_search_query("", 3));
    }

    #[test]
    fn test_validate_search_query_error() {
        assert!(matches!(
            validate_search_query("ab", 3),
            Err(AppError::Validation(ValidationError::QueryTooShort { min_len: 3 }))
        ));
        assert!(validate_search_query("abc", 3).is_ok());
    }

    #[test]
    fn test_validate_url_accepts_valid_urls() {
        assert!(validate_url("https://www.thesportsdb.com").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_invalid_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("www.thesportsdb.com").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("3").is_ok());
        assert!(validate_api_key("123456").is_ok());
        assert!(validate_api_key("").is_err());
        assert!(validate_api_key("12/34").is_err());
        assert!(validate_api_key("12 34").is_err());
    }
}
