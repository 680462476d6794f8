//! Command line surface of the suite binary
//!
//! The suite runs as a `harness = false` test target, so cargo hands it the
//! same arguments it hands libtest binaries (`cargo test foo -- --nocapture`).
//! Those are accepted here: positional filters narrow the scenario list the
//! way libtest filters narrow test names, and the libtest-only flags are
//! parsed and otherwise ignored.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Browser, SuiteConfig};
use crate::error::{E2eError, E2eResult};
use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "storefront-e2e")]
#[command(about = "E2E test suite for the demo storefront")]
pub struct SuiteArgs {
    /// Only run scenarios whose name contains one of these
    pub filters: Vec<String>,

    /// YAML config file (defaults apply for anything it leaves out)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start page every scenario opens
    #[arg(long)]
    pub base_url: Option<String>,

    /// Browser to use (chrome, firefox)
    #[arg(long, value_parser = parse_browser)]
    pub browser: Option<Browser>,

    /// Path to the chromedriver/geckodriver binary
    #[arg(long)]
    pub driver: Option<PathBuf>,

    /// Use an already-running WebDriver endpoint instead of spawning one
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser headless
    #[arg(long)]
    pub headless: Option<bool>,

    /// Explicit wait timeout
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Explicit wait poll interval
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Run only these scenarios (repeatable)
    #[arg(short, long, value_parser = parse_scenario)]
    pub name: Vec<Scenario>,

    /// List scenarios and exit
    #[arg(long)]
    pub list: bool,

    /// Fail instead of skipping when no driver can be found
    #[arg(long)]
    pub require_driver: bool,

    /// Output directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Filters must match a scenario name exactly
    #[arg(long)]
    pub exact: bool,

    /// Only run ignored tests; the suite has none
    #[arg(long, hide = true)]
    pub ignored: bool,

    #[arg(long, hide = true)]
    pub include_ignored: bool,

    #[arg(long, hide = true)]
    pub nocapture: bool,

    #[arg(long, hide = true)]
    pub show_output: bool,

    #[arg(short, long, hide = true)]
    pub quiet: bool,

    #[arg(long, hide = true)]
    pub test_threads: Option<usize>,

    #[arg(long, hide = true)]
    pub color: Option<String>,

    #[arg(long, hide = true)]
    pub format: Option<String>,

    #[arg(long, hide = true)]
    pub skip: Vec<String>,
}

fn parse_browser(s: &str) -> Result<Browser, String> {
    s.parse().map_err(|e: E2eError| e.to_string())
}

fn parse_scenario(s: &str) -> Result<Scenario, String> {
    s.parse().map_err(|e: E2eError| e.to_string())
}

impl SuiteArgs {
    /// Layer the config file, environment and flags into one validated config.
    pub fn build_config(&self) -> E2eResult<SuiteConfig> {
        let mut config = match &self.config {
            Some(path) => SuiteConfig::from_file(path)?,
            None => SuiteConfig::default(),
        };
        config.apply_env()?;

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(browser) = self.browser {
            config.driver.browser = browser;
        }
        if let Some(path) = &self.driver {
            config.driver.binary_path = Some(path.clone());
        }
        if let Some(url) = &self.webdriver_url {
            config.driver.webdriver_url = Some(url.clone());
        }
        if let Some(headless) = self.headless {
            config.driver.headless = headless;
        }
        if let Some(ms) = self.timeout_ms {
            config.wait.timeout_ms = ms;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.wait.poll_interval_ms = ms;
        }
        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Scenarios to run, in priority order.
    pub fn selected_scenarios(&self) -> Vec<Scenario> {
        if self.ignored {
            return Vec::new();
        }

        let base: Vec<Scenario> = if self.name.is_empty() {
            Scenario::ALL.to_vec()
        } else {
            self.name.clone()
        };

        let mut selected: Vec<Scenario> = base
            .into_iter()
            .filter(|scenario| self.matches_filters(scenario.name()))
            .filter(|scenario| !self.skip.iter().any(|s| scenario.name().contains(s.as_str())))
            .collect();
        selected.sort_by_key(|s| s.priority());
        selected.dedup();
        selected
    }

    fn matches_filters(&self, name: &str) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        self.filters.iter().any(|filter| {
            if self.exact {
                name == filter
            } else {
                name.contains(filter.as_str())
            }
        })
    }
}
