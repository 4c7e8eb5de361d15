use crate::browser::PageDriver;
use crate::dom::best_effort_snapshot;
use crate::error::LocatorError;
use crate::locator::query::build_xpath_query;
use crate::locator::record::CapturedRecord;
use crate::locator::rules::parse_element_types;
use crate::locator::synthesizer::{synthesize, Locator};
use crate::oracle::LocatorOracle;
use std::collections::HashSet;

/// Receives the events of a capture run.
///
/// Every method has a default that logs through the `log` facade, so implementors only
/// override what they want to surface differently.
pub trait CaptureObserver {
    /// The element types the page is about to be queried for
    fn targeting(&mut self, element_types: &[String], query: &str) {
        log::info!("Targeting elements: {}", element_types.join(", "));
        log::debug!("Element query: {}", query);
    }

    fn query_failed(&mut self, error: &LocatorError) {
        log::error!("{}", error);
    }

    fn no_elements(&mut self) {
        log::warn!("No elements found.");
    }

    /// The oracle could not be reached; the heuristic cascade is used for this element
    fn oracle_failed(&mut self, error: &LocatorError) {
        log::warn!("{}", error);
    }

    /// Called after each matched element, whether or not it was recorded
    fn progress(&mut self, processed: usize, total: usize) {
        log::debug!("Processing element {}/{}", processed, total);
    }
}

/// Observer that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CaptureObserver for LogObserver {}

/// How a capture run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    /// The query ran and matched elements were processed
    Captured,
    /// The query ran but matched nothing
    NoElements,
    /// The query could not be executed
    QueryFailed(String),
}

/// Result of capturing one page
#[derive(Debug, Clone)]
pub struct CaptureRun {
    pub records: Vec<CapturedRecord>,
    pub status: CaptureStatus,
    /// Number of elements the query matched
    pub matched: usize,
}

impl CaptureRun {
    fn empty(status: CaptureStatus) -> Self {
        Self { records: Vec::new(), status, matched: 0 }
    }
}

/// Capture the locators of every visible element on the page whose tag the rules select.
///
/// Elements are skipped when hidden (or when visibility cannot be determined), when no
/// unique locator exists, or when their locator was already emitted earlier in this page
/// or in any page recorded in `seen_selectors`. The locators of this page are added to
/// `seen_selectors` once the page is done.
pub fn capture(
    driver: &dyn PageDriver,
    oracle: Option<&dyn LocatorOracle>,
    use_oracle: bool,
    element_types_text: &str,
    seen_selectors: &mut HashSet<String>,
    observer: &mut dyn CaptureObserver,
) -> CaptureRun {
    let element_types = parse_element_types(element_types_text);
    let query = build_xpath_query(&element_types);
    observer.targeting(&element_types, &query);

    let elements = match driver.find_elements(&query) {
        Ok(elements) => elements,
        Err(e) => {
            observer.query_failed(&e);
            return CaptureRun::empty(CaptureStatus::QueryFailed(e.to_string()));
        }
    };

    if elements.is_empty() {
        observer.no_elements();
        return CaptureRun::empty(CaptureStatus::NoElements);
    }

    let oracle = if use_oracle { oracle } else { None };
    let total = elements.len();
    let mut records = Vec::new();
    let mut page_selectors: HashSet<String> = HashSet::new();

    for (idx, element) in elements.iter().enumerate() {
        match element.is_displayed() {
            Ok(true) => {
                let snapshot = best_effort_snapshot(&**element);
                let locator = synthesize(&snapshot, oracle, &mut |e: &LocatorError| observer.oracle_failed(e));

                match locator {
                    Locator::XPath(xpath) if !seen_selectors.contains(&xpath) && !page_selectors.contains(&xpath) => {
                        records.push(CapturedRecord::from_snapshot(&snapshot, xpath.clone()));
                        page_selectors.insert(xpath);
                    }
                    Locator::XPath(xpath) => log::debug!("Skipping duplicate locator {}", xpath),
                    not_unique => log::debug!("Skipping {}", not_unique),
                }
            }
            Ok(false) => {}
            Err(e) => log::debug!("Skipping element {}: {}", idx + 1, e),
        }

        observer.progress(idx + 1, total);
    }

    seen_selectors.extend(page_selectors);

    CaptureRun { records, status: CaptureStatus::Captured, matched: total }
}
