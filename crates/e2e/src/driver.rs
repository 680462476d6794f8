//! WebDriver server management - locating, spawning and health checking
//! `chromedriver` / `geckodriver`

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::{Child, Command};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::{Browser, DriverConfig, ENV_DRIVER};
use crate::error::{E2eError, E2eResult};

/// Handle to a running WebDriver server process
pub struct DriverProcess {
    child: Child,
    url: String,
    stopped: bool,
}

impl DriverProcess {
    /// Locate and spawn the driver, then wait until it reports ready.
    pub async fn spawn(config: &DriverConfig) -> E2eResult<Self> {
        let binary = resolve_binary(config, std::env::var_os(ENV_DRIVER).map(PathBuf::from))?;
        let port = match config.port {
            Some(port) => port,
            None => find_free_port()?,
        };
        let url = format!("http://127.0.0.1:{}", port);

        info!("Spawning {} on port {}", binary.display(), port);

        let mut cmd = Command::new(&binary);
        cmd.args(port_args(config, port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            E2eError::SessionStartup(format!("Failed to spawn {}: {}", binary.display(), e))
        })?;

        let mut handle = DriverProcess {
            child,
            url,
            stopped: false,
        };

        if let Err(e) = handle.wait_for_ready(config.startup_timeout()).await {
            handle.stop().await;
            return Err(e);
        }

        info!("Driver is ready at {}", handle.url);
        Ok(handle)
    }

    /// Poll `GET /status` until the driver says it can create sessions
    async fn wait_for_ready(&mut self, timeout_duration: Duration) -> E2eResult<()> {
        let status_url = format!("{}/status", self.url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            if let Some(status) = self.child.try_wait()? {
                return Err(E2eError::SessionStartup(format!(
                    "Driver exited during startup with {}",
                    status
                )));
            }

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    match resp.json::<StatusResponse>().await {
                        Ok(body) if body.value.ready => return Ok(()),
                        Ok(body) => debug!("Driver not ready yet: {}", body.value.message),
                        Err(e) => warn!("Unreadable status response: {}", e),
                    }
                }
                Ok(resp) => {
                    warn!("Status check returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for driver to start...");
                    }
                    // Connection refused is expected while the driver is starting
                    if !e.is_connect() {
                        warn!("Status check error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(E2eError::SessionStartup(format!(
            "Driver not ready after {} status checks",
            attempts
        )))
    }

    /// WebDriver endpoint of this process
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stop the driver. Safe to call more than once; never fails.
    pub async fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        // Already gone (crashed or exited during startup)
        let Some(pid) = self.child.id() else {
            return;
        };
        debug!("Stopping driver (pid: {})", pid);

        // Try graceful shutdown first
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok()
                && timeout(Duration::from_millis(200), self.child.wait()).await.is_ok()
            {
                return;
            }
        }

        // Force kill if still running
        if let Err(e) = self.child.kill().await {
            warn!("Failed to kill driver (pid: {}): {}", pid, e);
        }
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        if !self.stopped {
            let _ = self.child.start_kill();
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    value: StatusValue,
}

#[derive(Debug, Deserialize)]
struct StatusValue {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    message: String,
}

/// Pick the driver binary: explicit config, then the environment, then PATH.
pub fn resolve_binary(config: &DriverConfig, from_env: Option<PathBuf>) -> E2eResult<PathBuf> {
    let name = config.browser.driver_binary();

    if let Some(path) = config.binary_path.clone().or(from_env) {
        return if path.is_file() {
            Ok(path)
        } else {
            Err(E2eError::DriverNotFound(path.display().to_string()))
        };
    }

    which::which(name).map_err(|_| E2eError::DriverNotFound(name.to_string()))
}

/// True when [`resolve_binary`] would succeed for this config.
pub fn driver_available(config: &DriverConfig) -> bool {
    config.webdriver_url.is_some()
        || resolve_binary(config, std::env::var_os(ENV_DRIVER).map(PathBuf::from)).is_ok()
}

fn port_args(config: &DriverConfig, port: u16) -> Vec<String> {
    match config.browser {
        Browser::Chrome => vec![format!("--port={}", port)],
        Browser::Firefox => vec!["--port".to_string(), port.to_string()],
    }
}

/// Find a free port to use
fn find_free_port() -> E2eResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_free_port() {
        let port1 = find_free_port().unwrap();
        let port2 = find_free_port().unwrap();

        // Ports should be in valid range
        assert!(port1 > 1024);
        assert!(port2 > 1024);
    }

    #[test]
    fn test_port_args_per_browser() {
        let chrome = DriverConfig::default();
        assert_eq!(port_args(&chrome, 9515), vec!["--port=9515"]);

        let firefox = DriverConfig {
            browser: Browser::Firefox,
            ..Default::default()
        };
        assert_eq!(port_args(&firefox, 4444), vec!["--port", "4444"]);
    }

    #[test]
    fn test_explicit_path_wins_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("chromedriver");
        std::fs::write(&explicit, b"").unwrap();

        let config = DriverConfig {
            binary_path: Some(explicit.clone()),
            ..Default::default()
        };
        let resolved = resolve_binary(&config, Some(dir.path().join("other"))).unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn test_env_path_used_when_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let from_env = dir.path().join("geckodriver");
        std::fs::write(&from_env, b"").unwrap();

        let config = DriverConfig {
            browser: Browser::Firefox,
            ..Default::default()
        };
        assert_eq!(resolve_binary(&config, Some(from_env.clone())).unwrap(), from_env);
    }

    #[test]
    fn test_missing_explicit_path_is_driver_not_found() {
        let config = DriverConfig {
            binary_path: Some(PathBuf::from("/definitely/not/here/chromedriver")),
            ..Default::default()
        };
        let err = resolve_binary(&config, None).unwrap_err();
        assert!(matches!(err, E2eError::DriverNotFound(_)));
        assert!(err.is_startup());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_terminates_process_and_is_idempotent() {
        let child = Command::new("sleep")
            .arg("30")
            .kill_on_drop(true)
            .spawn()
            .unwrap();
        let mut process = DriverProcess {
            child,
            url: "http://127.0.0.1:1".to_string(),
            stopped: false,
        };

        let start = std::time::Instant::now();
        process.stop().await;
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(process.child.try_wait().unwrap().is_some());

        process.stop().await;
    }

    #[test]
    fn test_remote_endpoint_counts_as_available() {
        let config = DriverConfig {
            binary_path: Some(PathBuf::from("/definitely/not/here/chromedriver")),
            webdriver_url: Some("http://grid:4444".to_string()),
            ..Default::default()
        };
        assert!(driver_available(&config));
    }
}
