//! Command executor - the capability behind the Execution Gateway.
//!
//! One call spawns one external agent invocation, bounded by a hard
//! wall-clock timeout. The trait is pluggable (process launch here,
//! mocks in tests) so the orchestration logic never depends on the
//! transport used to reach the device-control path.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

use crate::device::{DeviceId, DeviceLock};
use crate::domain::ExecutionResult;

/// Default hard timeout for one agent invocation.
pub const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 300;

/// Placeholder in the argv template replaced by the instruction text.
pub const INSTRUCTION_PLACEHOLDER: &str = "{instruction}";

/// Placeholder in the argv template replaced by the device serial.
pub const DEVICE_PLACEHOLDER: &str = "{device}";

/// Runs one natural-language instruction to completion.
///
/// Infallible signature: timeouts, spawn failures, and non-zero exits are
/// all folded into the `ExecutionResult` per the gateway contract. The
/// implementation performs no retries - one call is at most one physical
/// action sequence on the device.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, instruction: &str) -> ExecutionResult;
}

/// Executor that spawns the configured agent process per instruction.
pub struct ProcessExecutor {
    /// Argv template; `{instruction}` and `{device}` are substituted.
    /// When no `{instruction}` placeholder is present the instruction is
    /// appended as the final argument.
    argv: Vec<String>,
    workdir: Option<PathBuf>,
    device: DeviceId,
    timeout: Duration,
    lock: Arc<DeviceLock>,
}

impl ProcessExecutor {
    pub fn new(
        argv: Vec<String>,
        workdir: Option<PathBuf>,
        device: DeviceId,
        timeout: Duration,
        lock: Arc<DeviceLock>,
    ) -> Self {
        Self {
            argv,
            workdir,
            device,
            timeout,
            lock,
        }
    }

    /// Resolve the argv template for one instruction.
    fn resolve_argv(&self, instruction: &str) -> Vec<String> {
        let mut resolved: Vec<String> = self
            .argv
            .iter()
            .map(|arg| {
                arg.replace(INSTRUCTION_PLACEHOLDER, instruction)
                    .replace(DEVICE_PLACEHOLDER, self.device.as_str())
            })
            .collect();
        if !self.argv.iter().any(|a| a.contains(INSTRUCTION_PLACEHOLDER)) {
            resolved.push(instruction.to_string());
        }
        resolved
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn run(&self, instruction: &str) -> ExecutionResult {
        let started = Instant::now();

        if self.argv.is_empty() {
            return ExecutionResult::faulted("executor command not configured", 0.0);
        }

        // Exclusive device access for the whole invocation, timeout included
        let _guard = self.lock.acquire().await;

        let argv = self.resolve_argv(instruction);
        log::info!("executing agent: {:?}", argv);

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .env("ANDROID_SERIAL", self.device.as_str())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Reap the agent if the timeout fires mid-flight
            .kill_on_drop(true);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let duration = started.elapsed().as_secs_f64();
                log::info!(
                    "agent finished in {:.1}s, exit status {:?}",
                    duration,
                    output.status.code()
                );
                ExecutionResult::completed(output.status.success(), &stdout, &stderr, duration)
            }
            Ok(Err(error)) => {
                log::warn!("agent launch failed: {}", error);
                ExecutionResult::faulted(error, started.elapsed().as_secs_f64())
            }
            Err(_) => {
                log::warn!("agent timed out after {}s", self.timeout.as_secs());
                ExecutionResult::timed_out(self.timeout.as_secs(), started.elapsed().as_secs_f64())
            }
        }
    }
}
