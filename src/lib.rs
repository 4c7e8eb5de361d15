//! # element-locator
//!
//! A Rust library for capturing XPath locators of web page elements via Chrome DevTools
//! Protocol (CDP), designed for building page-object repositories for test automation.
//!
//! ## Features
//!
//! - **Rule-driven capture**: choose which element types to capture with a simple rule list
//! - **Locator cascade**: text, id, name and type based XPaths, optionally proposed by an LLM oracle
//! - **Session-wide deduplication**: a locator is emitted once, even across many captured pages
//! - **Excel export**: one worksheet per captured page plus the rules that were used
//!
//! ## CLI
//!
//! ```bash
//! # Open a browser, log in manually, then type `capture <page>` / `stop`
//! cargo run --bin element-locator -- --url https://example.com --app-name MyApp
//!
//! # Scripted, headless
//! cargo run --bin element-locator -- --url https://example.com --headless --capture Home
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use element_locator::{BrowserSession, CaptureConfig, CaptureSession, LaunchOptions, LogObserver};
//!
//! # fn main() -> element_locator::Result<()> {
//! let mut session = CaptureSession::new(CaptureConfig::new().app_name("MyApp"));
//!
//! session.start("https://example.com", |url| {
//!     let browser = BrowserSession::launch(LaunchOptions::new().headless(true))?;
//!     browser.navigate(url)?;
//!     browser.wait_for_navigation()?;
//!     Ok(browser)
//! })?;
//!
//! let page = session.capture_page("Home", &mut LogObserver)?;
//! println!("Captured {} locators on {}", page.records, page.name);
//!
//! if let Some(path) = session.stop_and_export(".")? {
//!     println!("Workbook written to {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management and the traits the pipeline queries pages through
//! - [`dom`]: Element snapshots and injected page scripts
//! - [`locator`]: Element type rules, query building, locator synthesis and the capture loop
//! - [`oracle`]: Optional LLM oracle (OpenAI-compatible client behind the `oracle` feature)
//! - [`session`]: Capture session state
//! - [`export`]: Excel workbook export
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod dom;
pub mod error;
pub mod export;
pub mod locator;
pub mod oracle;
pub mod session;

pub use browser::{BrowserHandle, BrowserSession, ConnectionOptions, LaunchOptions, PageDriver, PageElement};
pub use dom::ElementSnapshot;
pub use error::{LocatorError, Result};
pub use export::{build_workbook, ExportedWorkbook, CONFIG_SHEET_NAME, XLSX_MIME_TYPE};
pub use locator::{capture, CaptureObserver, CaptureRun, CaptureStatus, CapturedRecord, Locator, LogObserver};
pub use oracle::LocatorOracle;
pub use session::{CaptureConfig, CaptureSession, CapturedPage};

#[cfg(feature = "oracle")]
pub use oracle::{OpenAiOracle, OracleSettings};
