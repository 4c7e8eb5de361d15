//! element-locator CLI
//!
//! Opens a browser on the start URL, lets the user log in and navigate by hand, and
//! captures the locators of each page on command. The session ends with `stop`, which
//! writes the Excel workbook, or `abort`, which discards it.

use anyhow::{bail, Context};
use clap::Parser;
use element_locator::{
    BrowserSession, CaptureConfig, CaptureObserver, CaptureSession, CaptureStatus, ConnectionOptions, LaunchOptions,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "element-locator")]
#[command(version)]
#[command(about = "Capture XPath locators of web page elements into an Excel workbook", long_about = None)]
struct Cli {
    /// Start URL (http or https)
    #[arg(long, value_name = "URL")]
    url: String,

    /// Application name, used as the workbook file name prefix
    #[arg(long, value_name = "NAME")]
    app_name: Option<String>,

    /// Launch browser in headless mode (default: headed, so you can log in)
    #[arg(long)]
    headless: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// WebSocket endpoint URL of an already running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// File with element type rules (one `- tag` per line)
    #[arg(long, value_name = "FILE")]
    element_types: Option<PathBuf>,

    /// File with locator rules passed to the oracle
    #[arg(long, value_name = "FILE")]
    xpath_rules: Option<PathBuf>,

    /// Ask the LLM oracle for a locator before the built-in heuristics
    #[arg(long)]
    use_oracle: bool,

    /// API key of the OpenAI-compatible oracle
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    oracle_api_key: Option<String>,

    /// Model used by the oracle
    #[arg(long, env = "OPENAI_MODEL")]
    oracle_model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    oracle_base_url: Option<String>,

    /// Directory the workbook is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Capture the start page under this name and exit (repeatable, non-interactive)
    #[arg(long = "capture", value_name = "PAGE")]
    captures: Vec<String>,
}

/// Prints per-element progress on one terminal line
struct ConsoleObserver;

impl CaptureObserver for ConsoleObserver {
    fn progress(&mut self, processed: usize, total: usize) {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "\rProcessing element {}/{}", processed, total);
        if processed == total {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = CaptureConfig::new().use_oracle(cli.use_oracle);
    if let Some(name) = &cli.app_name {
        config = config.app_name(name);
    }
    if let Some(path) = &cli.element_types {
        let rules = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        config = config.element_types(rules);
    }
    if let Some(path) = &cli.xpath_rules {
        let rules = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        config = config.xpath_rules(rules);
    }

    let mut session = with_oracle(CaptureSession::<BrowserSession>::new(config), &cli)?;

    let launch = LaunchOptions {
        headless: cli.headless,
        chrome_path: cli.chrome_path.clone(),
        ..Default::default()
    };
    let ws_endpoint = cli.ws_endpoint.clone();

    session.start(&cli.url, |url| {
        let browser = match ws_endpoint {
            Some(ws) => BrowserSession::connect(ConnectionOptions::new(ws))?,
            None => BrowserSession::launch(launch)?,
        };
        browser.navigate(url)?;
        browser.wait_for_navigation()?;
        Ok(browser)
    })?;

    if !cli.captures.is_empty() {
        return run_scripted(&mut session, &cli);
    }

    eprintln!("Browser opened on {}", cli.url);
    eprintln!("Log in manually if needed, then navigate to each page and capture it.");
    print_help();

    run_interactive(&mut session, &cli)
}

#[cfg(feature = "oracle")]
fn with_oracle(session: CaptureSession<BrowserSession>, cli: &Cli) -> anyhow::Result<CaptureSession<BrowserSession>> {
    use element_locator::{LocatorOracle, OpenAiOracle, OracleSettings};

    let mut settings = OracleSettings::new();
    if let Some(key) = &cli.oracle_api_key {
        settings = settings.api_key(key);
    }
    if let Some(model) = &cli.oracle_model {
        settings = settings.model(model);
    }
    if let Some(base_url) = &cli.oracle_base_url {
        settings = settings.base_url(base_url);
    }

    Ok(session.with_oracle_factory(move |config| {
        let oracle = OpenAiOracle::new(settings.clone(), config.xpath_rules.clone())?;
        Ok(Box::new(oracle) as Box<dyn LocatorOracle>)
    }))
}

#[cfg(not(feature = "oracle"))]
fn with_oracle(session: CaptureSession<BrowserSession>, cli: &Cli) -> anyhow::Result<CaptureSession<BrowserSession>> {
    if cli.use_oracle {
        bail!("--use-oracle requires the `oracle` feature");
    }
    Ok(session)
}

fn run_scripted(session: &mut CaptureSession<BrowserSession>, cli: &Cli) -> anyhow::Result<()> {
    for name in &cli.captures {
        match session.capture_page(name, &mut ConsoleObserver) {
            Ok(page) => report_page(&page),
            Err(e) => eprintln!("Error capturing '{}': {}", name, e),
        }
    }

    match session.stop_and_export(&cli.output_dir)? {
        Some(path) => {
            report_export(&path);
            Ok(())
        }
        None => bail!("No data captured yet, nothing to export"),
    }
}

fn run_interactive(session: &mut CaptureSession<BrowserSession>, cli: &Cli) -> anyhow::Result<()> {
    let stdin = io::stdin();

    loop {
        eprint!("> ");
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF behaves like `stop` so nothing captured is lost
            if let Some(path) = session.stop_and_export(&cli.output_dir)? {
                report_export(&path);
            }
            return Ok(());
        }

        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "capture" => match session.capture_page(argument, &mut ConsoleObserver) {
                Ok(page) => report_page(&page),
                Err(e) => eprintln!("Error: {}", e),
            },
            "pages" => {
                if session.pages().is_empty() {
                    eprintln!("No pages captured yet");
                }
                for (name, records) in session.pages() {
                    eprintln!("  {} ({} elements)", name, records.len());
                }
            }
            "stop" => {
                let dir = if argument.is_empty() { cli.output_dir.clone() } else { PathBuf::from(argument) };
                match session.stop_and_export(&dir) {
                    Ok(Some(path)) => {
                        report_export(&path);
                        return Ok(());
                    }
                    Ok(None) => {
                        eprintln!("No data captured yet, nothing was written");
                        return Ok(());
                    }
                    Err(e) => {
                        eprintln!("Export failed: {}", e);
                        eprintln!("Captured pages are kept. Run `stop [dir]` again or `abort`.");
                    }
                }
            }
            "abort" => {
                session.abort();
                eprintln!("Session aborted, nothing was saved");
                return Ok(());
            }
            "help" => print_help(),
            other => eprintln!("Unknown command: {} (type `help`)", other),
        }
    }
}

fn report_export(path: &Path) {
    eprintln!("Capture session ended. Data written to {}", path.display());
}

fn report_page(page: &element_locator::CapturedPage) {
    match page.status {
        CaptureStatus::NoElements => eprintln!("Page '{}' captured: no elements found", page.name),
        _ => eprintln!("Page '{}' captured: {} of {} elements", page.name, page.records, page.matched),
    }
}

fn print_help() {
    eprintln!();
    eprintln!("COMMANDS:");
    eprintln!("    capture <page>    Capture the current page under the given name");
    eprintln!("    pages             List captured pages");
    eprintln!("    stop [dir]        Close the browser and write the workbook");
    eprintln!("    abort             Close the browser and discard everything");
    eprintln!("    help              Print this help message");
    eprintln!();
}
