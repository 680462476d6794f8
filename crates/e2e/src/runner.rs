//! Main test runner: one fresh session per scenario, teardown no matter what

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::SuiteConfig;
use crate::error::E2eResult;
use crate::scenario::{Scenario, ScenarioContext};
use crate::session::Session;

/// Where a scenario is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    Created,
    Running,
    Passed,
    Failed,
}

impl ScenarioState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScenarioState::Passed | ScenarioState::Failed)
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub description: String,
    pub priority: u32,
    pub state: ScenarioState,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot_path: Option<PathBuf>,
}

impl TestResult {
    pub fn success(&self) -> bool {
        self.state == ScenarioState::Passed
    }
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn from_results(started_at: String, duration_ms: u64, results: Vec<TestResult>) -> Self {
        let passed = results.iter().filter(|r| r.success()).count();
        Self {
            started_at,
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Main E2E test runner
pub struct TestRunner {
    config: SuiteConfig,
}

impl TestRunner {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    /// Run every scenario in priority order
    pub async fn run_all(&self) -> TestSuiteResult {
        self.run_scenarios(&Scenario::ALL).await
    }

    /// Run the given scenarios sequentially, each in its own session
    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> TestSuiteResult {
        let started_at = chrono::Utc::now().to_rfc3339();
        let start = Instant::now();
        let mut ordered = scenarios.to_vec();
        ordered.sort_by_key(|s| s.priority());

        info!("Running {} scenario(s) against {}", ordered.len(), self.config.base_url);

        let mut results = Vec::with_capacity(ordered.len());
        for scenario in ordered {
            let result = self.run_scenario(scenario).await;
            if result.success() {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let suite = TestSuiteResult::from_results(
            started_at,
            start.elapsed().as_millis() as u64,
            results,
        );

        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            suite.passed, suite.failed, suite.duration_ms
        );
        suite
    }

    /// Run one scenario: Created -> Running -> Passed | Failed.
    ///
    /// The session is closed on every path out of `Running`.
    pub async fn run_scenario(&self, scenario: Scenario) -> TestResult {
        let start = Instant::now();
        let mut result = TestResult {
            name: scenario.name().to_string(),
            description: scenario.description().to_string(),
            priority: scenario.priority(),
            state: ScenarioState::Created,
            duration_ms: 0,
            error: None,
            screenshot_path: None,
        };

        info!("TEST {}: {}", scenario.priority(), scenario.description());

        let session = match Session::open(&self.config).await {
            Ok(session) => session,
            Err(e) => {
                result.state = ScenarioState::Failed;
                result.error = Some(e.to_string());
                result.duration_ms = start.elapsed().as_millis() as u64;
                return result;
            }
        };

        result.state = ScenarioState::Running;
        debug!("Running scenario: {}", scenario);

        let ctx = ScenarioContext {
            page: session.page(),
            accounts: self.config.accounts.clone(),
            base_url: self.config.base_url.clone(),
        };

        match scenario.run(&ctx).await {
            Ok(()) => result.state = ScenarioState::Passed,
            Err(e) => {
                result.state = ScenarioState::Failed;
                result.error = Some(e.to_string());
                if self.config.screenshots_on_failure {
                    let path = self.screenshot_path(scenario);
                    match session.capture_screenshot(&path).await {
                        Ok(()) => result.screenshot_path = Some(path),
                        Err(e) => warn!("Could not capture failure screenshot: {}", e),
                    }
                }
            }
        }

        session.close().await;
        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    fn screenshot_path(&self, scenario: Scenario) -> PathBuf {
        self.config
            .output_dir
            .join("screenshots")
            .join(format!("{}.png", scenario.name()))
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, state: ScenarioState) -> TestResult {
        TestResult {
            name: name.to_string(),
            description: String::new(),
            priority: 1,
            state,
            duration_ms: 5,
            error: None,
            screenshot_path: None,
        }
    }

    fn unreachable_driver_config(output_dir: PathBuf) -> SuiteConfig {
        let mut config = SuiteConfig {
            output_dir,
            ..Default::default()
        };
        config.driver.binary_path = Some("/definitely/not/here/chromedriver".into());
        config
    }

    #[test]
    fn test_suite_counts() {
        let suite = TestSuiteResult::from_results(
            "2026-01-01T00:00:00+00:00".into(),
            42,
            vec![
                result("valid_login", ScenarioState::Passed),
                result("logout", ScenarioState::Failed),
                result("add_to_cart", ScenarioState::Passed),
            ],
        );
        assert_eq!(suite.total, 3);
        assert_eq!(suite.passed, 2);
        assert_eq!(suite.failed, 1);
        assert!(!suite.all_passed());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ScenarioState::Created.is_terminal());
        assert!(!ScenarioState::Running.is_terminal());
        assert!(ScenarioState::Passed.is_terminal());
        assert!(ScenarioState::Failed.is_terminal());
    }

    #[tokio::test]
    async fn test_startup_failure_fails_scenario_only() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TestRunner::new(unreachable_driver_config(dir.path().to_path_buf()));

        let suite = runner
            .run_scenarios(&[Scenario::Logout, Scenario::ValidLogin])
            .await;

        // Every scenario gets its own attempt, in priority order.
        assert_eq!(suite.total, 2);
        assert_eq!(suite.failed, 2);
        assert_eq!(suite.results[0].name, "valid_login");
        assert_eq!(suite.results[1].name, "logout");
        for r in &suite.results {
            assert_eq!(r.state, ScenarioState::Failed);
            assert!(r.error.as_deref().unwrap().contains("not found"));
            assert!(r.screenshot_path.is_none());
        }
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TestRunner::new(unreachable_driver_config(dir.path().join("out")));
        let suite = TestSuiteResult::from_results(
            "2026-01-01T00:00:00+00:00".into(),
            1,
            vec![result("valid_login", ScenarioState::Passed)],
        );

        let path = runner.write_results(&suite).unwrap();
        let written: TestSuiteResult =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.passed, 1);
        assert_eq!(written.results[0].state, ScenarioState::Passed);
    }
}
