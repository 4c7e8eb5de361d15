//! Browser management module
//!
//! The capture pipeline only needs a small slice of a browser: run an XPath query on the
//! current page, and for every match check visibility and read a few attributes. That slice
//! is expressed by three traits:
//! - [`BrowserHandle`]: an exclusively owned browser that exposes its current page and can be closed
//! - [`PageDriver`]: a page that can be queried with XPath
//! - [`PageElement`]: one matched element
//!
//! [`BrowserSession`] implements them on top of `headless_chrome`; [`mock`] provides an
//! in-memory implementation.

pub mod config;
pub mod mock;
pub mod session;
pub mod url;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::{BrowserSession, ChromeElement, ChromePage};
pub use url::validate_start_url;

use crate::dom::ElementSnapshot;
use crate::error::Result;

/// A single element matched by a page query
pub trait PageElement {
    /// Whether the element is currently rendered and visible
    fn is_displayed(&self) -> Result<bool>;

    /// Read the element's tag, text and locator-relevant attributes
    fn snapshot(&self) -> Result<ElementSnapshot>;
}

/// A page that can be queried for elements
pub trait PageDriver {
    /// Find all elements matching an XPath expression, in document order
    fn find_elements(&self, xpath: &str) -> Result<Vec<Box<dyn PageElement + '_>>>;
}

/// An exclusively owned browser instance
pub trait BrowserHandle {
    /// The page currently shown to the user
    fn page(&self) -> Result<Box<dyn PageDriver + '_>>;

    /// Shut the browser down
    fn close(&mut self) -> Result<()>;
}
