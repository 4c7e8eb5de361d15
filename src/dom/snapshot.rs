use serde::{Deserialize, Serialize};

/// Attributes observed on a single DOM element at capture time.
///
/// Every attribute is optional: a missing attribute, an empty attribute and a failed
/// read all end up as `None` (or an empty `tag_name`), so the locator cascade only
/// ever deals with present, non-empty values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElementSnapshot {
    /// Lowercase HTML tag name (e.g., "div", "button", "input")
    #[serde(default)]
    pub tag_name: String,

    /// Rendered text of the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The `type` attribute (only meaningful for inputs and buttons)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,

    /// Outer HTML markup of the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_html: Option<String>,
}

impl ElementSnapshot {
    /// Create a snapshot for a tag with no attributes
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_lowercase(),
            ..Default::default()
        }
    }

    /// Builder method: set rendered text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method: set id attribute
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method: set name attribute
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method: set type attribute
    pub fn with_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    /// Builder method: set outer HTML
    pub fn with_outer_html(mut self, html: impl Into<String>) -> Self {
        self.outer_html = Some(html.into());
        self
    }

    /// Trimmed display text, empty when absent
    pub fn display_text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// Non-empty id attribute
    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    /// Non-empty name attribute
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    /// Non-empty type attribute
    pub fn element_type(&self) -> Option<&str> {
        non_empty(&self.element_type)
    }

    pub fn outer_html(&self) -> &str {
        self.outer_html.as_deref().unwrap_or("")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Normalize a snapshot decoded from the page: lowercase tag, empty strings become `None`
    pub fn normalized(mut self) -> Self {
        self.tag_name = self.tag_name.trim().to_lowercase();
        for field in [
            &mut self.text,
            &mut self.id,
            &mut self.name,
            &mut self.element_type,
            &mut self.outer_html,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Truncate a string to at most `max_chars` characters, respecting char boundaries
pub fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
