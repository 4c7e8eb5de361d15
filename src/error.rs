use thiserror::Error;

/// Errors raised while driving the browser, capturing locators or exporting them
#[derive(Error, Debug)]
pub enum LocatorError {
    /// Browser process could not be launched
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Could not attach to a running browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// The start URL is not an http(s) address
    #[error("Invalid URL '{0}': URL must start with http:// or https://")]
    InvalidUrl(String),

    /// A browser session is already running
    #[error("A browser session is already active")]
    SessionActive,

    #[error("No active browser session")]
    NoActiveSession,

    #[error("Invalid page name: {0}")]
    InvalidPageName(String),

    /// The element query could not be executed against the page
    #[error("XPath query failed: {0}")]
    QueryFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// Attributes of a single element could not be read
    #[error("Failed to read element: {0}")]
    ElementReadFailed(String),

    /// The oracle is enabled but cannot be created (missing credential, feature disabled)
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Oracle request failed: {0}")]
    OracleFailed(String),

    #[error("Workbook export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LocatorError {
    /// Whether the error stems from user input or configuration rather than the browser
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LocatorError::InvalidUrl(_)
                | LocatorError::SessionActive
                | LocatorError::NoActiveSession
                | LocatorError::InvalidPageName(_)
                | LocatorError::OracleUnavailable(_)
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(LocatorError::InvalidUrl("ftp://x".into()).is_configuration());
        assert!(LocatorError::OracleUnavailable("no key".into()).is_configuration());
        assert!(!LocatorError::QueryFailed("boom".into()).is_configuration());
        assert!(!LocatorError::OracleFailed("timeout".into()).is_configuration());
    }

    #[test]
    fn test_error_messages() {
        let err = LocatorError::InvalidUrl("example.com".into());
        assert_eq!(err.to_string(), "Invalid URL 'example.com': URL must start with http:// or https://");
    }
}
