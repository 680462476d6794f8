//! Storefront E2E Test Suite
//!
//! This crate drives the Sauce Labs demo storefront through a W3C WebDriver
//! server and checks its login, catalog, cart and logout flows:
//! - Locates or spawns `chromedriver` / `geckodriver`
//! - Opens a fresh browser session per scenario and always closes it
//! - Resolves elements immediately, waits explicitly via polling
//! - Writes a JSON report plus screenshots of failed scenarios
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    └── run_scenario(scenario) -> TestResult                 │
//! │          ├── Session::open()  -> DriverProcess + Client     │
//! │          ├── Scenario::run(ctx)                             │
//! │          │     ├── LoginPage / InventoryPage / Menu         │
//! │          │     ├── Page::find / type_into / click           │
//! │          │     └── Waiter::until(condition, timeout)        │
//! │          └── Session::close()  (always)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SuiteConfig: defaults <- YAML <- STOREFRONT_E2E_* <- CLI   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod page;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod storefront;
pub mod wait;

pub use config::SuiteConfig;
pub use error::{E2eError, E2eResult};
pub use runner::TestRunner;
pub use scenario::Scenario;
pub use session::Session;
