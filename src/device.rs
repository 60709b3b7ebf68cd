//! Device identity and serialization.
//!
//! The target device is a singleton resource: every control and observe
//! call against it must be serialized so two spawned agent processes never
//! interleave actions on the same phone. The identifier is plain
//! configuration threaded into constructors, never a process global.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Target device identifier (an adb serial, e.g. "192.168.1.15:41937").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(serial: impl Into<String>) -> Self {
        Self(serial.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutex serializing all traffic to one physical device.
///
/// Shared (via `Arc`) by the Execution Gateway's executor and the
/// Observer; each holds the guard for the full lifetime of its spawned
/// call, timeout included.
#[derive(Debug, Default)]
pub struct DeviceLock {
    inner: Mutex<()>,
}

impl DeviceLock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Acquire exclusive access to the device.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}
