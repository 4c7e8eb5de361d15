/// Tags captured when the element type rules yield nothing usable
pub const FALLBACK_ELEMENT_TYPES: [&str; 7] = ["button", "a", "input", "select", "textarea", "span", "div"];

/// Element type rules used when none are configured
pub const DEFAULT_ELEMENT_TYPES: &str = "- input
- button
- a
- select
- textarea
- span
- div
";

/// Locator rules handed to the oracle when none are configured
pub const DEFAULT_XPATH_RULES: &str = "# XPath Generation Rules
1. Text-based XPath (HIGHEST PRIORITY)
2. ID-based XPath
3. Name attribute
4. Unique attributes
";

/// Tokens at or above this length are never treated as tag names
pub(crate) const MAX_TAG_LEN: usize = 20;

pub(crate) fn fallback_element_types() -> Vec<String> {
    FALLBACK_ELEMENT_TYPES.iter().map(|t| t.to_string()).collect()
}

/// Parse element type rules into lowercase tag names.
///
/// Only `-` list items count; `#` comments and blank lines are skipped and a trailing
/// `(annotation)` is dropped. Falls back to [`FALLBACK_ELEMENT_TYPES`] when nothing survives.
pub fn parse_element_types(rules: &str) -> Vec<String> {
    let mut types = Vec::new();

    for line in rules.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(item) = line.strip_prefix('-') else {
            continue;
        };

        let token = match item.split_once('(') {
            Some((before, _)) => before.trim(),
            None => item.trim(),
        };

        if !token.is_empty() && !token.contains(char::is_whitespace) && token.chars().count() < MAX_TAG_LEN {
            types.push(token.to_lowercase());
        }
    }

    if types.is_empty() {
        return fallback_element_types();
    }
    types
}
