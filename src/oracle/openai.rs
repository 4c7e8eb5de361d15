//! OpenAI-compatible chat completions client used as a locator oracle.
//!
//! Works against any server exposing `POST {base_url}/chat/completions`.

use crate::error::{LocatorError, Result};
use crate::oracle::{LocatorOracle, OracleRequest, SYSTEM_PROMPT};
use crate::locator::rules::DEFAULT_XPATH_RULES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";

/// Connection settings for the oracle endpoint
#[derive(Debug, Clone)]
pub struct OracleSettings {
    /// Bearer token; required
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 100,
        }
    }
}

impl OracleSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder method: set model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder method: set base URL (e.g., `http://localhost:11434/v1`)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder method: set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponseChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatResponseChoice>,
}

/// Blocking oracle client
pub struct OpenAiOracle {
    settings: OracleSettings,
    api_key: String,
    rules: String,
    client: reqwest::blocking::Client,
}

impl OpenAiOracle {
    /// Create a client; fails when no API key is configured
    pub fn new(settings: OracleSettings, rules: impl Into<String>) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LocatorError::OracleUnavailable("OpenAI API key not found".to_string()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LocatorError::OracleUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        let rules = rules.into();
        let rules = if rules.trim().is_empty() { DEFAULT_XPATH_RULES.to_string() } else { rules };

        Ok(Self { settings, api_key, rules, client })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn chat_request(&self, request: &OracleRequest<'_>) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage { role: Role::System, content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: Role::User, content: request.prompt(&self.rules) },
            ],
            temperature: 0.0,
            max_tokens: self.settings.max_tokens,
        }
    }
}

impl LocatorOracle for OpenAiOracle {
    fn suggest_xpath(&self, request: &OracleRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(self.settings.completions_url())
            .bearer_auth(&self.api_key)
            .json(&self.chat_request(request))
            .send()
            .map_err(|e| LocatorError::OracleFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LocatorError::OracleFailed(format!("API error {}: {}", status.as_u16(), body)));
        }

        let response: ChatResponse = response.json().map_err(|e| LocatorError::OracleFailed(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| LocatorError::OracleFailed("Response contained no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSnapshot;

    #[test]
    fn test_missing_api_key_is_unavailable() {
        let result = OpenAiOracle::new(OracleSettings::new(), DEFAULT_XPATH_RULES);
        assert!(matches!(result, Err(LocatorError::OracleUnavailable(_))));

        let result = OpenAiOracle::new(OracleSettings::new().api_key("   "), DEFAULT_XPATH_RULES);
        assert!(matches!(result, Err(LocatorError::OracleUnavailable(_))));
    }

    #[test]
    fn test_completions_url() {
        let settings = OracleSettings::new().base_url("http://localhost:11434/v1/");
        assert_eq!(settings.completions_url(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(OracleSettings::default().completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_chat_request_shape() {
        let oracle = OpenAiOracle::new(OracleSettings::new().api_key("sk-test").model("gpt-4o-mini"), "").unwrap();
        let snapshot = ElementSnapshot::new("a").with_text("Docs");
        let request = OracleRequest::from_snapshot(&snapshot);

        let body = serde_json::to_value(oracle.chat_request(&request)).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        let prompt = body["messages"][1]["content"].as_str().unwrap();
        assert!(prompt.contains("Text-based XPath (HIGHEST PRIORITY)"));
        assert!(prompt.contains("- Text: Docs"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"id":"x","object":"chat.completion","created":1,"model":"m",
            "choices":[{"index":0,"message":{"role":"assistant","content":" //a[text()='Docs'] "},"finish_reason":"stop"}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.role, Role::Assistant);
        assert_eq!(response.choices[0].message.content.trim(), "//a[text()='Docs']");
    }
}
