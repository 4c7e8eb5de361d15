//! Locator capture pipeline
//!
//! This module turns the elements of a page into XPath locators:
//! - rules: element type rules → tag names
//! - query: tag names → one XPath query
//! - synthesizer: element snapshot → locator
//! - capture: the per-page loop with visibility filtering and deduplication
//! - naming: worksheet-safe, unique page names

pub mod capture;
pub mod naming;
pub mod query;
pub mod record;
pub mod rules;
pub mod synthesizer;

pub use capture::{capture, CaptureObserver, CaptureRun, CaptureStatus, LogObserver};
pub use naming::{sanitize_sheet_name, unique_sheet_name, MAX_SHEET_NAME_LEN};
pub use query::build_xpath_query;
pub use record::CapturedRecord;
pub use rules::{parse_element_types, DEFAULT_ELEMENT_TYPES, DEFAULT_XPATH_RULES, FALLBACK_ELEMENT_TYPES};
pub use synthesizer::{heuristic_locator, synthesize, Locator, NOT_UNIQUE_MARKER};
