//! Browser session lifecycle: one session per scenario, always closed

use std::future::Future;
use std::path::Path;

use fantoccini::{Client, ClientBuilder};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::config::{Browser, DriverConfig, SuiteConfig};
use crate::driver::DriverProcess;
use crate::error::{E2eError, E2eResult};
use crate::page::Page;
use crate::wait::Waiter;

/// A live browser session plus the driver process backing it (if spawned)
pub struct Session {
    client: Client,
    driver: Option<DriverProcess>,
    waiter: Waiter,
}

impl Session {
    /// Start a driver if needed, launch the browser and load `base_url`.
    pub async fn open(config: &SuiteConfig) -> E2eResult<Self> {
        let (endpoint, mut driver) = match &config.driver.webdriver_url {
            Some(url) => (url.clone(), None),
            None => {
                let process = DriverProcess::spawn(&config.driver).await?;
                (process.url().to_string(), Some(process))
            }
        };

        debug!("Connecting to WebDriver at {}", endpoint);
        let client = match ClientBuilder::native()
            .capabilities(capabilities(&config.driver))
            .connect(&endpoint)
            .await
        {
            Ok(client) => client,
            Err(e) => {
                if let Some(process) = driver.as_mut() {
                    process.stop().await;
                }
                return Err(E2eError::SessionStartup(format!(
                    "Could not create {} session: {}",
                    config.driver.browser.as_str(),
                    e
                )));
            }
        };

        let session = Session {
            client,
            driver,
            waiter: Waiter::from_config(&config.wait),
        };

        if config.driver.maximize {
            if let Err(e) = session.client.maximize_window().await {
                debug!("Could not maximize window: {}", e);
            }
        }

        if let Err(e) = session.page().goto(&config.base_url).await {
            session.close().await;
            return Err(E2eError::SessionStartup(format!(
                "Could not open {}: {}",
                config.base_url, e
            )));
        }

        info!("Browser opened at {}", config.base_url);
        Ok(session)
    }

    /// Open a session, run `body` against its page and always close it.
    pub async fn scoped<F, Fut, T>(config: &SuiteConfig, body: F) -> E2eResult<T>
    where
        F: FnOnce(Page) -> Fut,
        Fut: Future<Output = E2eResult<T>>,
    {
        let session = Self::open(config).await?;
        let result = body(session.page()).await;
        session.close().await;
        result
    }

    pub fn page(&self) -> Page {
        Page::new(self.client.clone(), self.waiter)
    }

    /// Save a PNG of the current viewport.
    pub async fn capture_screenshot(&self, path: &Path) -> E2eResult<()> {
        let png = self.client.screenshot().await?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, png)?;
        debug!("Screenshot saved to {}", path.display());
        Ok(())
    }

    /// Quit the browser and stop the driver. Never fails; problems are
    /// logged and otherwise ignored so teardown can't mask the real outcome.
    pub async fn close(self) {
        let Session {
            client, mut driver, ..
        } = self;

        if let Err(e) = client.close().await {
            warn!("Error closing browser session: {}", e);
        }
        if let Some(process) = driver.as_mut() {
            process.stop().await;
        }
        info!("Browser closed");
    }
}

/// W3C capabilities for the configured browser
pub fn capabilities(config: &DriverConfig) -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!(config.browser.as_str()));

    match config.browser {
        Browser::Chrome => {
            let mut args = vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"];
            if config.headless {
                args.push("--headless=new");
            }
            caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        }
        Browser::Firefox => {
            let args: Vec<&str> = if config.headless {
                vec!["-headless"]
            } else {
                vec![]
            };
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
    }

    caps
}
