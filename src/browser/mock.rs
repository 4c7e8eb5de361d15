//! In-memory browser for tests and dry runs
//!
//! A [`MockBrowser`] holds a flat list of elements. Queries return the elements whose tag
//! is named by a `self::tag` test in the XPath expression, which is the only query shape
//! the capture pipeline produces.

use crate::browser::{BrowserHandle, PageDriver, PageElement};
use crate::dom::ElementSnapshot;
use crate::error::{LocatorError, Result};
use std::cell::RefCell;

/// Mock element with a fixed snapshot and visibility
#[derive(Debug, Clone)]
pub struct MockElement {
    tag: String,
    snapshot: ElementSnapshot,
    visible: bool,
    visibility_error: bool,
    snapshot_error: bool,
}

impl MockElement {
    /// Create a visible element
    pub fn new(snapshot: ElementSnapshot) -> Self {
        Self {
            tag: snapshot.tag_name.clone(),
            snapshot,
            visible: true,
            visibility_error: false,
            snapshot_error: false,
        }
    }

    /// Builder method: mark as hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Builder method: make the visibility check fail
    pub fn failing_visibility(mut self) -> Self {
        self.visibility_error = true;
        self
    }

    /// Builder method: make attribute reads fail
    pub fn failing_snapshot(mut self) -> Self {
        self.snapshot_error = true;
        self
    }
}

impl PageElement for MockElement {
    fn is_displayed(&self) -> Result<bool> {
        if self.visibility_error {
            return Err(LocatorError::EvaluationFailed("mock visibility failure".to_string()));
        }
        Ok(self.visible)
    }

    fn snapshot(&self) -> Result<ElementSnapshot> {
        if self.snapshot_error {
            return Err(LocatorError::ElementReadFailed("mock snapshot failure".to_string()));
        }
        Ok(self.snapshot.clone())
    }
}

/// Mock browser holding the elements of its single page
#[derive(Debug, Default)]
pub struct MockBrowser {
    elements: Vec<MockElement>,
    fail_queries: bool,
    queries: RefCell<Vec<String>>,
    closed: bool,
}

impl MockBrowser {
    pub fn new(elements: Vec<MockElement>) -> Self {
        Self {
            elements,
            ..Default::default()
        }
    }

    /// Builder method: make every query fail
    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Replace the page content, as if the user navigated elsewhere
    pub fn set_elements(&mut self, elements: Vec<MockElement>) {
        self.elements = elements;
    }

    pub fn set_failing_queries(&mut self, fail: bool) {
        self.fail_queries = fail;
    }

    /// XPath queries received so far
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl BrowserHandle for MockBrowser {
    fn page(&self) -> Result<Box<dyn PageDriver + '_>> {
        if self.closed {
            return Err(LocatorError::TabOperationFailed("browser closed".to_string()));
        }
        Ok(Box::new(MockPage { browser: self }))
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

struct MockPage<'a> {
    browser: &'a MockBrowser,
}

impl PageDriver for MockPage<'_> {
    fn find_elements(&self, xpath: &str) -> Result<Vec<Box<dyn PageElement + '_>>> {
        self.browser.queries.borrow_mut().push(xpath.to_string());

        if self.browser.fail_queries {
            return Err(LocatorError::QueryFailed(format!("{}: mock query failure", xpath)));
        }

        Ok(self
            .browser
            .elements
            .iter()
            .filter(|element| query_selects_tag(xpath, &element.tag))
            .map(|element| Box::new(element.clone()) as Box<dyn PageElement + '_>)
            .collect())
    }
}

fn query_selects_tag(xpath: &str, tag: &str) -> bool {
    let test = format!("self::{}", tag);
    xpath.match_indices(&test).any(|(idx, _)| {
        xpath[idx + test.len()..]
            .chars()
            .next()
            .is_some_and(|c| c == ' ' || c == ']')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_selects_tag() {
        let query = "//*[self::a or self::button]";
        assert!(query_selects_tag(query, "a"));
        assert!(query_selects_tag(query, "button"));
        assert!(!query_selects_tag(query, "abbr"));
        assert!(!query_selects_tag(query, "butto"));
        assert!(!query_selects_tag(query, "div"));
    }

    #[test]
    fn test_mock_page_filters_by_tag() {
        let browser = MockBrowser::new(vec![
            MockElement::new(ElementSnapshot::new("a").with_text("Home")),
            MockElement::new(ElementSnapshot::new("div").with_text("Body")),
        ]);

        let page = browser.page().unwrap();
        let found = page.find_elements("//*[self::a]").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].snapshot().unwrap().display_text(), "Home");
        drop(found);
        drop(page);
        assert_eq!(browser.queries(), vec!["//*[self::a]".to_string()]);
    }

    #[test]
    fn test_mock_failures() {
        let browser = MockBrowser::new(vec![]).failing_queries();
        let page = browser.page().unwrap();
        assert!(matches!(page.find_elements("//*[self::a]"), Err(LocatorError::QueryFailed(_))));

        let element = MockElement::new(ElementSnapshot::new("a")).failing_visibility();
        assert!(element.is_displayed().is_err());
    }

    #[test]
    fn test_closed_browser_has_no_page() {
        let mut browser = MockBrowser::new(vec![]);
        browser.close().unwrap();
        assert!(browser.is_closed());
        assert!(browser.page().is_err());
    }
}
