//! Capture session state
//!
//! A [`CaptureSession`] owns everything one interactive capture needs: the browser, the
//! lazily created oracle, the pages captured so far and the locators already emitted.
//! It is created by the caller, passed by `&mut` to every action, and emptied after a
//! successful export.

pub mod config;

pub use config::CaptureConfig;

use crate::browser::{validate_start_url, BrowserHandle};
use crate::error::{LocatorError, Result};
use crate::export::{build_workbook, workbook_file_name, ExportedWorkbook, CONFIG_SHEET_NAME};
use crate::locator::{capture, sanitize_sheet_name, unique_sheet_name, CaptureObserver, CaptureStatus, CapturedRecord};
use crate::oracle::LocatorOracle;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Creates the oracle on the first capture that needs it
pub type OracleFactory = Box<dyn FnMut(&CaptureConfig) -> Result<Box<dyn LocatorOracle>>>;

/// Summary of one stored page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPage {
    /// Name the page was stored under (may differ from the requested name)
    pub name: String,
    /// Records stored for the page
    pub records: usize,
    /// Elements the query matched
    pub matched: usize,
    pub status: CaptureStatus,
}

/// State of one capture session
pub struct CaptureSession<B: BrowserHandle> {
    config: CaptureConfig,
    browser: Option<B>,
    oracle: Option<Box<dyn LocatorOracle>>,
    oracle_factory: Option<OracleFactory>,
    pages: IndexMap<String, Vec<CapturedRecord>>,
    seen_selectors: HashSet<String>,
}

impl<B: BrowserHandle> CaptureSession<B> {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            browser: None,
            oracle: None,
            oracle_factory: None,
            pages: IndexMap::new(),
            seen_selectors: HashSet::new(),
        }
    }

    /// Builder method: set how the oracle is created when `use_oracle` is enabled
    pub fn with_oracle_factory<F>(mut self, factory: F) -> Self
    where
        F: FnMut(&CaptureConfig) -> Result<Box<dyn LocatorOracle>> + 'static,
    {
        self.oracle_factory = Some(Box::new(factory));
        self
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Whether a browser is currently open
    pub fn is_active(&self) -> bool {
        self.browser.is_some()
    }

    pub fn browser(&self) -> Option<&B> {
        self.browser.as_ref()
    }

    pub fn browser_mut(&mut self) -> Option<&mut B> {
        self.browser.as_mut()
    }

    /// Pages captured so far, in capture order
    pub fn pages(&self) -> &IndexMap<String, Vec<CapturedRecord>> {
        &self.pages
    }

    /// Locators emitted in any page of this session
    pub fn seen_selectors(&self) -> &HashSet<String> {
        &self.seen_selectors
    }

    /// Open a browser on `url`.
    ///
    /// `open` receives the validated URL and must return a browser showing it. Nothing
    /// changes if a browser is already active, the URL is invalid or `open` fails.
    pub fn start<F>(&mut self, url: &str, open: F) -> Result<()>
    where
        F: FnOnce(&str) -> Result<B>,
    {
        if self.browser.is_some() {
            return Err(LocatorError::SessionActive);
        }

        let url = validate_start_url(url)?;
        let browser = open(&url)?;
        self.browser = Some(browser);

        log::info!("Session started on {}", url);
        Ok(())
    }

    /// Capture the current page of the browser and store it under a unique name
    pub fn capture_page(&mut self, requested_name: &str, observer: &mut dyn CaptureObserver) -> Result<CapturedPage> {
        let requested = sanitize_sheet_name(requested_name);
        if requested.is_empty() {
            return Err(LocatorError::InvalidPageName("Please enter a page name".to_string()));
        }

        if self.browser.is_none() {
            return Err(LocatorError::NoActiveSession);
        }

        self.ensure_oracle()?;

        let Some(browser) = self.browser.as_ref() else {
            return Err(LocatorError::NoActiveSession);
        };
        let page = browser.page()?;

        let run = capture(
            &*page,
            self.oracle.as_deref(),
            self.config.use_oracle,
            &self.config.element_types,
            &mut self.seen_selectors,
            observer,
        );

        if let CaptureStatus::QueryFailed(reason) = &run.status {
            return Err(LocatorError::QueryFailed(reason.clone()));
        }

        let existing: Vec<&str> = self
            .pages
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(CONFIG_SHEET_NAME))
            .collect();
        let name = unique_sheet_name(&requested, &existing);

        let summary = CapturedPage {
            name: name.clone(),
            records: run.records.len(),
            matched: run.matched,
            status: run.status,
        };

        log::info!("Page captured: {} ({} elements)", name, summary.records);
        self.pages.insert(name, run.records);

        Ok(summary)
    }

    fn ensure_oracle(&mut self) -> Result<()> {
        if !self.config.use_oracle || self.oracle.is_some() {
            return Ok(());
        }

        let factory = self
            .oracle_factory
            .as_mut()
            .ok_or_else(|| LocatorError::OracleUnavailable("No oracle configured".to_string()))?;

        self.oracle = Some(factory(&self.config)?);
        log::debug!("Oracle created");
        Ok(())
    }

    /// Close the browser. A failure to close is logged; the handle is dropped either way.
    pub fn stop(&mut self) -> Result<()> {
        let mut browser = self.browser.take().ok_or(LocatorError::NoActiveSession)?;

        match browser.close() {
            Ok(()) => log::info!("Browser closed"),
            Err(e) => log::warn!("Could not close browser: {}", e),
        }

        Ok(())
    }

    /// Build the workbook for all captured pages without touching session state.
    ///
    /// Returns `None` when nothing has been captured.
    pub fn build_export(&self) -> Result<Option<ExportedWorkbook>> {
        if self.pages.is_empty() {
            log::warn!("No data captured yet");
            return Ok(None);
        }

        let bytes = build_workbook(&self.pages, &self.config.element_types)?;

        let mut sheet_names: Vec<String> = self.pages.keys().cloned().collect();
        sheet_names.push(CONFIG_SHEET_NAME.to_string());

        Ok(Some(ExportedWorkbook {
            file_name: workbook_file_name(self.config.app_name.as_deref(), unix_timestamp()),
            sheet_names,
            bytes,
        }))
    }

    /// Export into `dir` and reset the session. On failure the session is left intact.
    pub fn export_to(&mut self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let Some(workbook) = self.build_export()? else {
            return Ok(None);
        };

        let path = workbook.write_to(dir)?;
        self.reset();

        log::info!("Capture session ended. Data written to {}", path.display());
        Ok(Some(path))
    }

    /// Close the browser if it is still open, then export.
    ///
    /// A failed export keeps the captured pages, so the call can be repeated once the
    /// browser is already closed.
    pub fn stop_and_export(&mut self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        if self.browser.is_some() {
            self.stop()?;
        }
        self.export_to(dir)
    }

    /// Close the browser if open and discard everything captured
    pub fn abort(&mut self) {
        if self.browser.is_some() {
            let _ = self.stop();
        }
        self.reset();
        log::info!("Capture session aborted");
    }

    /// Discard captured pages, emitted locators and the oracle
    pub fn reset(&mut self) {
        self.pages.clear();
        self.seen_selectors.clear();
        self.oracle = None;
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
