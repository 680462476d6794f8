//! Error types for E2E testing

use fantoccini::error::{CmdError, ErrorStatus};
use thiserror::Error;

use crate::page::Locator;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Session failed to start: {0}")]
    SessionStartup(String),

    #[error("WebDriver binary '{0}' not found. Pass --driver, set STOREFRONT_E2E_DRIVER or put it on PATH")]
    DriverNotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element not interactable: {0}")]
    ElementNotInteractable(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout after {timeout_ms} ms waiting for: {condition}")]
    Timeout { condition: String, timeout_ms: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] CmdError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Classify a WebDriver command failure against the element it targeted.
    pub fn from_command(err: CmdError, locator: &Locator) -> Self {
        if err.is_no_such_element() {
            return E2eError::ElementNotFound(locator.to_string());
        }
        match &err {
            CmdError::Standard(wd)
                if matches!(
                    wd.error,
                    ErrorStatus::ElementNotInteractable
                        | ErrorStatus::ElementClickIntercepted
                        | ErrorStatus::InvalidElementState
                ) =>
            {
                E2eError::ElementNotInteractable(format!("{} ({})", locator, wd.message))
            }
            _ => E2eError::WebDriver(err),
        }
    }

    /// True when a wait should poll again instead of giving up: the element
    /// isn't there yet, or the node it matched was replaced mid-check.
    pub fn is_transient_lookup(&self) -> bool {
        match self {
            E2eError::ElementNotFound(_) => true,
            E2eError::WebDriver(err) => err.is_stale_element_reference(),
            _ => false,
        }
    }

    /// True for failures that happen before any scenario step runs.
    pub fn is_startup(&self) -> bool {
        matches!(self, E2eError::SessionStartup(_) | E2eError::DriverNotFound(_))
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
