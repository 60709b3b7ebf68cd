//! Observer - read-only capability that captures on-device state.
//!
//! The process-backed implementation runs a configured bridge command
//! (typically an adb-based helper) that prints one ScreenSnapshot as JSON
//! on stdout. It never mutates device state; repeated calls observe
//! whatever the screen happens to show.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::device::{DeviceId, DeviceLock};
use crate::domain::ScreenSnapshot;
use crate::error::{PilotError, Result};
use crate::executor::DEVICE_PLACEHOLDER;

/// Default bounded timeout for one observation.
pub const DEFAULT_OBSERVE_TIMEOUT_SECS: u64 = 30;

/// Captures the current on-device state as a structured snapshot.
#[async_trait]
pub trait Observer: Send + Sync {
    async fn observe(&self) -> Result<ScreenSnapshot>;
}

/// Observer that spawns the configured bridge command per observation.
pub struct ProcessObserver {
    /// Argv template; `{device}` is substituted with the serial.
    argv: Vec<String>,
    device: DeviceId,
    timeout: Duration,
    lock: Arc<DeviceLock>,
}

impl ProcessObserver {
    pub fn new(
        argv: Vec<String>,
        device: DeviceId,
        timeout: Duration,
        lock: Arc<DeviceLock>,
    ) -> Self {
        Self {
            argv,
            device,
            timeout,
            lock,
        }
    }

    fn resolve_argv(&self) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| arg.replace(DEVICE_PLACEHOLDER, self.device.as_str()))
            .collect()
    }
}

#[async_trait]
impl Observer for ProcessObserver {
    async fn observe(&self) -> Result<ScreenSnapshot> {
        if self.argv.is_empty() {
            return Err(PilotError::ObservationFailure(
                "observer command not configured".to_string(),
            ));
        }

        let _guard = self.lock.acquire().await;

        let argv = self.resolve_argv();
        log::debug!("observing device via {:?}", argv);

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .env("ANDROID_SERIAL", self.device.as_str())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| PilotError::ObservationTimeout {
                secs: self.timeout.as_secs(),
            })?
            .map_err(|e| PilotError::ObservationFailure(format!("launch failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PilotError::ObservationFailure(format!(
                "bridge exited {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim())
            .map_err(|e| PilotError::ObservationFailure(format!("unparseable snapshot: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observer_for(argv: Vec<&str>, timeout: Duration) -> ProcessObserver {
        ProcessObserver::new(
            argv.into_iter().map(String::from).collect(),
            DeviceId::new("test-device:5555"),
            timeout,
            DeviceLock::new(),
        )
    }

    const SNAPSHOT_JSON: &str = r#"{"alerts":[],"elements":[{"kind":"button","text":"OK"}],"texts_top":["Home"]}"#;

    #[tokio::test]
    async fn test_observe_parses_snapshot() {
        let cmd = format!("printf %s '{}'", SNAPSHOT_JSON);
        let observer = observer_for(vec!["sh", "-c", &cmd], Duration::from_secs(10));
        let snapshot = observer.observe().await.unwrap();
        assert_eq!(snapshot.texts_top, vec!["Home"]);
        assert_eq!(snapshot.elements.len(), 1);
        assert_eq!(snapshot.elements[0].text, "OK");
    }

    #[tokio::test]
    async fn test_observe_timeout() {
        let observer = observer_for(vec!["sleep", "5"], Duration::from_secs(1));
        let err = observer.observe().await.unwrap_err();
        assert!(matches!(err, PilotError::ObservationTimeout { secs: 1 }));
    }

    #[tokio::test]
    async fn test_observe_nonzero_exit_is_failure() {
        let observer = observer_for(
            vec!["sh", "-c", "echo offline >&2; exit 1"],
            Duration::from_secs(10),
        );
        let err = observer.observe().await.unwrap_err();
        match err {
            PilotError::ObservationFailure(msg) => assert!(msg.contains("offline")),
            other => panic!("expected ObservationFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_observe_unparseable_output_is_failure() {
        let observer = observer_for(
            vec!["sh", "-c", "echo not-json"],
            Duration::from_secs(10),
        );
        let err = observer.observe().await.unwrap_err();
        match err {
            PilotError::ObservationFailure(msg) => assert!(msg.contains("unparseable")),
            other => panic!("expected ObservationFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_observe_empty_argv_is_failure() {
        let observer = observer_for(vec![], Duration::from_secs(10));
        assert!(observer.observe().await.is_err());
    }

    #[test]
    fn test_resolve_argv_substitutes_device() {
        let observer = observer_for(
            vec!["adb", "-s", "{device}", "shell", "dump-ui"],
            Duration::from_secs(10),
        );
        let argv = observer.resolve_argv();
        assert_eq!(argv[2], "test-device:5555");
    }
}
