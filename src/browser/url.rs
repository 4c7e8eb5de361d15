use crate::error::{LocatorError, Result};

/// Validate the URL a capture session starts from.
///
/// Only absolute `http://` and `https://` addresses are accepted; the scheme check is
/// case-insensitive and surrounding whitespace is ignored. Returns the trimmed URL.
pub fn validate_start_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();

    let rest = if let Some(rest) = lower.strip_prefix("https://") {
        rest
    } else if let Some(rest) = lower.strip_prefix("http://") {
        rest
    } else {
        return Err(LocatorError::InvalidUrl(trimmed.to_string()));
    };

    // A scheme alone is not an address
    if rest.is_empty() || rest.starts_with('/') || rest.contains(char::is_whitespace) {
        return Err(LocatorError::InvalidUrl(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(validate_start_url("https://example.com").unwrap(), "https://example.com");
        assert_eq!(validate_start_url("http://localhost:3000/login").unwrap(), "http://localhost:3000/login");
        assert_eq!(validate_start_url("HTTPS://Example.com").unwrap(), "HTTPS://Example.com");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(validate_start_url("  https://example.com  ").unwrap(), "https://example.com");
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert!(matches!(validate_start_url("example.com"), Err(LocatorError::InvalidUrl(_))));
        assert!(matches!(validate_start_url("localhost:3000"), Err(LocatorError::InvalidUrl(_))));
        assert!(matches!(validate_start_url(""), Err(LocatorError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(validate_start_url("file:///tmp/index.html").is_err());
        assert!(validate_start_url("about:blank").is_err());
        assert!(validate_start_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_rejects_empty_host() {
        assert!(validate_start_url("https://").is_err());
        assert!(validate_start_url("http:///path").is_err());
        assert!(validate_start_url("https://exa mple.com").is_err());
    }
}
