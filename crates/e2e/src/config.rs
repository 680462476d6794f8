//! Suite configuration
//!
//! Layered as defaults, then an optional YAML file, then `STOREFRONT_E2E_*`
//! environment variables, then whatever the CLI sets on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

pub const ENV_BASE_URL: &str = "STOREFRONT_E2E_BASE_URL";
pub const ENV_DRIVER: &str = "STOREFRONT_E2E_DRIVER";
pub const ENV_WEBDRIVER_URL: &str = "STOREFRONT_E2E_WEBDRIVER_URL";
pub const ENV_HEADLESS: &str = "STOREFRONT_E2E_HEADLESS";
pub const ENV_BROWSER: &str = "STOREFRONT_E2E_BROWSER";

/// Top-level configuration for a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Start page every scenario navigates to
    pub base_url: String,

    /// WebDriver and browser settings
    pub driver: DriverConfig,

    /// Explicit wait policy
    pub wait: WaitConfig,

    /// Accounts used by the login scenarios
    pub accounts: Accounts,

    /// Output directory for results
    pub output_dir: PathBuf,

    /// Save a screenshot when a scenario fails
    pub screenshots_on_failure: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.saucedemo.com/".to_string(),
            driver: DriverConfig::default(),
            wait: WaitConfig::default(),
            accounts: Accounts::default(),
            output_dir: PathBuf::from("test-results"),
            screenshots_on_failure: true,
        }
    }
}

impl SuiteConfig {
    /// Parse a config from YAML; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Apply `STOREFRONT_E2E_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> E2eResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(path) = lookup(ENV_DRIVER) {
            self.driver.binary_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup(ENV_WEBDRIVER_URL) {
            self.driver.webdriver_url = Some(url);
        }
        if let Some(value) = lookup(ENV_HEADLESS) {
            self.driver.headless = parse_bool(ENV_HEADLESS, &value)?;
        }
        if let Some(value) = lookup(ENV_BROWSER) {
            self.driver.browser = value.parse()?;
        }
        Ok(())
    }

    /// Reject settings that can't produce a meaningful run.
    pub fn validate(&self) -> E2eResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.wait.timeout_ms == 0 {
            return Err(E2eError::Config("wait.timeout_ms must be > 0".into()));
        }
        if self.wait.poll_interval_ms == 0 {
            return Err(E2eError::Config("wait.poll_interval_ms must be > 0".into()));
        }
        if self.wait.poll_interval_ms > self.wait.timeout_ms {
            return Err(E2eError::Config(format!(
                "wait.poll_interval_ms ({}) exceeds wait.timeout_ms ({})",
                self.wait.poll_interval_ms, self.wait.timeout_ms
            )));
        }
        if self.driver.startup_timeout_ms == 0 {
            return Err(E2eError::Config("driver.startup_timeout_ms must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> E2eResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(E2eError::Config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
        }
    }

    /// Name of the WebDriver server binary for this browser
    pub fn driver_binary(&self) -> &'static str {
        match self {
            Browser::Chrome => "chromedriver",
            Browser::Firefox => "geckodriver",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            other => Err(E2eError::Config(format!("unsupported browser '{}'", other))),
        }
    }
}

/// WebDriver server and browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Browser to drive
    pub browser: Browser,

    /// Path to the driver binary (None = STOREFRONT_E2E_DRIVER or PATH lookup)
    pub binary_path: Option<PathBuf>,

    /// Already-running WebDriver endpoint; nothing is spawned when set
    pub webdriver_url: Option<String>,

    /// Port for a spawned driver (None = find free port)
    pub port: Option<u16>,

    /// Run the browser without a window
    pub headless: bool,

    /// Maximize the window once the session is up
    pub maximize: bool,

    /// How long a spawned driver gets to report ready
    pub startup_timeout_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chrome,
            binary_path: None,
            webdriver_url: None,
            port: None,
            headless: true,
            maximize: true,
            startup_timeout_ms: 30_000,
        }
    }
}

impl DriverConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

/// Explicit wait policy shared by every wait in the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            poll_interval_ms: 500,
        }
    }
}

impl WaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Username/password pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new("", "")
    }
}

// Keep passwords out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Accounts known to the demo storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Accounts {
    pub valid: Credentials,
    pub locked_out_username: String,
    pub wrong_password: String,
}

impl Default for Accounts {
    fn default() -> Self {
        Self {
            valid: Credentials::new("standard_user", "secret_sauce"),
            locked_out_username: "locked_out_user".to_string(),
            wrong_password: "wrong_password123".to_string(),
        }
    }
}

impl Accounts {
    pub fn wrong_password(&self) -> Credentials {
        Credentials::new(self.valid.username.clone(), self.wrong_password.clone())
    }

    pub fn locked_out(&self) -> Credentials {
        Credentials::new(self.locked_out_username.clone(), self.valid.password.clone())
    }
}
