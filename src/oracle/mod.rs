//! Text-generation oracle consulted for locators
//!
//! An oracle receives the attributes of one element and answers with free text. Only an
//! answer that, once cleaned, starts with `//` is trusted as an XPath.

#[cfg(feature = "oracle")]
pub mod openai;

#[cfg(feature = "oracle")]
pub use openai::{OpenAiOracle, OracleSettings};

use crate::dom::{truncate_chars, ElementSnapshot};
use crate::error::Result;

/// System message sent with every request
pub const SYSTEM_PROMPT: &str = "Return ONLY the XPath string.";

const MAX_PROMPT_HTML: usize = 300;
const MAX_PROMPT_TEXT: usize = 100;

/// Element attributes sent to the oracle, already truncated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest<'a> {
    pub tag: &'a str,
    pub text: &'a str,
    pub id: &'a str,
    pub name: &'a str,
    pub outer_html: &'a str,
}

impl<'a> OracleRequest<'a> {
    pub fn from_snapshot(snapshot: &'a ElementSnapshot) -> Self {
        Self {
            tag: &snapshot.tag_name,
            text: truncate_chars(snapshot.display_text(), MAX_PROMPT_TEXT),
            id: snapshot.id().unwrap_or(""),
            name: snapshot.name().unwrap_or(""),
            outer_html: truncate_chars(snapshot.outer_html(), MAX_PROMPT_HTML),
        }
    }

    /// Render the user prompt, embedding the active locator rules
    pub fn prompt(&self, rules: &str) -> String {
        format!(
            "You are an XPath expert. Follow the rules strictly.\n\n{}\n\nGenerate XPath for:\n- Tag: {}\n- Text: {}\n- ID: {}\n- Name: {}\n- HTML: {}\n\nReturn ONLY the XPath string.\n",
            rules.trim_end(),
            self.tag,
            or_none(self.text),
            or_none(self.id),
            or_none(self.name),
            self.outer_html,
        )
    }
}

fn or_none(value: &str) -> &str {
    if value.is_empty() { "none" } else { value }
}

/// A service proposing XPath locators for elements
pub trait LocatorOracle {
    /// Ask for a locator; returns the raw reply text
    fn suggest_xpath(&self, request: &OracleRequest<'_>) -> Result<String>;
}

/// Strip markdown fences, a leading `xpath` language tag and wrapping quotes from a reply
pub fn clean_oracle_reply(reply: &str) -> String {
    let mut cleaned = reply.replace("```", "");
    cleaned = cleaned.trim().to_string();

    if let Some(rest) = cleaned.strip_prefix("xpath").or_else(|| cleaned.strip_prefix("XPath")) {
        cleaned = rest.trim_start_matches(':').trim().to_string();
    }

    let mut value = cleaned.as_str();
    loop {
        let trimmed = value.trim();
        let unwrapped = ['"', '\'', '`']
            .iter()
            .find_map(|q| trimmed.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)));
        match unwrapped {
            Some(inner) => value = inner,
            None => return trimmed.to_string(),
        }
    }
}
