use crate::dom::{truncate_chars, ElementSnapshot};
use crate::error::LocatorError;
use crate::oracle::{clean_oracle_reply, LocatorOracle, OracleRequest};
use std::fmt;

/// Display texts at or above this many characters are too fragile for a text locator
const MAX_TEXT_LOCATOR_LEN: usize = 50;

/// Marker appended to the tag when no unique locator could be derived
pub const NOT_UNIQUE_MARKER: &str = "[NOT UNIQUE]";

/// Outcome of locator synthesis for one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// An XPath expression expected to identify the element
    XPath(String),
    /// Nothing distinguishes the element beyond its tag
    NotUnique { tag: String },
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::XPath(xpath) => f.write_str(xpath),
            Locator::NotUnique { tag } => write!(f, "//{}  {}", tag, NOT_UNIQUE_MARKER),
        }
    }
}

/// Derive a locator from the element's attributes alone.
///
/// Priority: short display text, then `id`, then `name`, then `type` for inputs and buttons.
pub fn heuristic_locator(snapshot: &ElementSnapshot) -> Locator {
    let tag = snapshot.tag_name.as_str();
    let text = snapshot.display_text();

    if !text.is_empty() && text.chars().count() < MAX_TEXT_LOCATOR_LEN {
        return Locator::XPath(format!("//{}[text()='{}']", tag, text.replace('\'', "\\'")));
    }
    if let Some(id) = snapshot.id() {
        return Locator::XPath(format!("//{}[@id='{}']", tag, id));
    }
    if let Some(name) = snapshot.name() {
        return Locator::XPath(format!("//{}[@name='{}']", tag, name));
    }
    if let Some(element_type) = snapshot.element_type() {
        if snapshot.is_tag("input") || snapshot.is_tag("button") {
            return Locator::XPath(format!("//{}[@type='{}']", tag, element_type));
        }
    }

    Locator::NotUnique { tag: tag.to_string() }
}

/// Derive a locator, asking the oracle first when one is given.
///
/// The oracle's answer is used only if it is an XPath rooted at `//`; anything else,
/// including a failed request, falls through to [`heuristic_locator`]. Oracle failures are
/// passed to `on_oracle_error`.
pub fn synthesize(
    snapshot: &ElementSnapshot,
    oracle: Option<&dyn LocatorOracle>,
    on_oracle_error: &mut dyn FnMut(&LocatorError),
) -> Locator {
    if let Some(oracle) = oracle {
        let request = OracleRequest::from_snapshot(snapshot);
        match oracle.suggest_xpath(&request) {
            Ok(reply) => {
                let xpath = clean_oracle_reply(&reply);
                if xpath.starts_with("//") {
                    return Locator::XPath(xpath);
                }
                log::debug!(
                    "Oracle reply for <{}> is not an XPath, using heuristics: {}",
                    snapshot.tag_name,
                    truncate_chars(&reply, 80)
                );
            }
            Err(e) => on_oracle_error(&e),
        }
    }

    heuristic_locator(snapshot)
}
