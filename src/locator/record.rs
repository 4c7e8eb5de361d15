use crate::dom::{truncate_chars, ElementSnapshot};
use serde::{Deserialize, Serialize};

/// Maximum characters of display text kept per record
pub const MAX_RECORD_TEXT: usize = 100;

/// One captured element: tag, display text and its locator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapturedRecord {
    pub tag: String,
    pub text: String,
    pub selector: String,
}

impl CapturedRecord {
    pub fn new(tag: impl Into<String>, text: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            selector: selector.into(),
        }
    }

    /// Build a record from a snapshot, truncating its display text
    pub fn from_snapshot(snapshot: &ElementSnapshot, selector: impl Into<String>) -> Self {
        Self::new(
            snapshot.tag_name.clone(),
            truncate_chars(snapshot.display_text(), MAX_RECORD_TEXT),
            selector,
        )
    }
}
