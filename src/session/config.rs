use crate::locator::{DEFAULT_ELEMENT_TYPES, DEFAULT_XPATH_RULES};

/// Settings of one capture session
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Application name used as the export file prefix
    pub app_name: Option<String>,

    /// Locator rules passed to the oracle
    pub xpath_rules: String,

    /// Element type rules selecting which tags are captured
    pub element_types: String,

    /// Ask the oracle before falling back to heuristics
    pub use_oracle: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            xpath_rules: DEFAULT_XPATH_RULES.to_string(),
            element_types: DEFAULT_ELEMENT_TYPES.to_string(),
            use_oracle: false,
        }
    }
}

impl CaptureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set application name
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Builder method: set locator rules
    pub fn xpath_rules(mut self, rules: impl Into<String>) -> Self {
        self.xpath_rules = rules.into();
        self
    }

    /// Builder method: set element type rules
    pub fn element_types(mut self, rules: impl Into<String>) -> Self {
        self.element_types = rules.into();
        self
    }

    /// Builder method: enable the oracle
    pub fn use_oracle(mut self, enabled: bool) -> Self {
        self.use_oracle = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CaptureConfig::default();
        assert!(config.app_name.is_none());
        assert!(!config.use_oracle);
        assert_eq!(config.element_types, DEFAULT_ELEMENT_TYPES);
        assert_eq!(config.xpath_rules, DEFAULT_XPATH_RULES);
    }

    #[test]
    fn test_builder() {
        let config = CaptureConfig::new().app_name("Shop").element_types("- a").use_oracle(true);
        assert_eq!(config.app_name.as_deref(), Some("Shop"));
        assert_eq!(config.element_types, "- a");
        assert!(config.use_oracle);
    }
}
