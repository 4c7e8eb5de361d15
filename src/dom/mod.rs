//! DOM inspection module
//!
//! This module provides the typed view the capture pipeline has of page elements:
//! - ElementSnapshot: best-effort snapshot of one element's attributes
//! - The JavaScript snippets injected into the page to read elements

pub mod snapshot;

pub use snapshot::{truncate_chars, ElementSnapshot};

use crate::browser::PageElement;

/// Function declaration called on an element to read its attributes as a JSON string
pub(crate) const SNAPSHOT_ELEMENT_JS: &str = include_str!("snapshot_element.js");

/// Function declaration called on an element to check whether it is rendered and visible
pub(crate) const IS_DISPLAYED_JS: &str = include_str!("is_displayed.js");

/// Function expression counting the nodes an XPath query matches in the document
pub(crate) const COUNT_MATCHES_JS: &str = include_str!("count_matches.js");

/// Snapshot an element, collapsing any read failure into an empty snapshot
pub fn best_effort_snapshot(element: &dyn PageElement) -> ElementSnapshot {
    match element.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::debug!("Failed to snapshot element, using empty attributes: {}", e);
            ElementSnapshot::default()
        }
    }
}
