//! E2E test harness entry point
//!
//! This file is the test binary that runs the storefront scenarios.
//! Run with: cargo test --package storefront-e2e --test e2e
//! Pass flags after `--`, e.g. `-- --name add_to_cart --headless false`.
//! Plain test filters work too: `cargo test add_to_cart` runs that scenario.

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storefront_e2e::cli::SuiteArgs;
use storefront_e2e::driver::driver_available;
use storefront_e2e::{E2eResult, Scenario, TestRunner};

fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = SuiteArgs::parse();

    if args.list {
        for scenario in Scenario::ALL {
            println!("{:>2}  {:<18} {}", scenario.priority(), scenario, scenario.description());
        }
        return;
    }

    // Run async main
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async_main(args));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: SuiteArgs) -> E2eResult<bool> {
    let config = args.build_config()?;

    let scenarios = args.selected_scenarios();
    if scenarios.is_empty() {
        info!("No scenarios match the given filters");
        return Ok(true);
    }

    if !args.require_driver && !driver_available(&config.driver) {
        warn!(
            "Skipping storefront scenarios: {} not found (set STOREFRONT_E2E_DRIVER or pass --require-driver)",
            config.driver.browser.driver_binary()
        );
        return Ok(true);
    }

    let runner = TestRunner::new(config);
    let results = runner.run_scenarios(&scenarios).await;
    runner.write_results(&results)?;

    if results.all_passed() {
        info!("All {} scenario(s) passed", results.total);
    }
    Ok(results.all_passed())
}
