//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{DeployConfig, DeviceDescriptor};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Where a streamed process's stdout and stderr go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutput {
    /// Forward to this process's own stdout/stderr.
    Inherit,
    /// Capture through a pipe and throw it away.
    Discard,
}

// ── Device Port Traits ────────────────────────────────────────────────────────

/// A long-running process spawned by [`DeviceBridge::stream`].
///
/// Owned by a single worker task. `wait` resolves when the process exits on
/// its own; `kill` terminates it and reaps it.
pub trait LogProcess: Send + 'static {
    /// Wait for the process to exit.
    fn wait(&mut self) -> impl Future<Output = Result<()>> + Send;
    /// Terminate the process.
    fn kill(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Operations against a connected device, addressed by serial.
#[allow(async_fn_in_trait)]
pub trait DeviceBridge {
    /// The process handle returned by [`DeviceBridge::stream`].
    type Process: LogProcess;

    /// Take one snapshot of the devices the transport can see.
    async fn devices(&self) -> Result<Vec<DeviceDescriptor>>;
    /// Run a shell command on the device and capture its output and exit status.
    async fn shell(&self, serial: &str, command: &str) -> Result<Output>;
    /// Copy a local file to `remote` on the device.
    async fn push(&self, serial: &str, local: &Path, remote: &str) -> Result<Output>;
    /// Create `remote` on the device with the given text content.
    async fn create_file(&self, serial: &str, remote: &str, content: &str) -> Result<Output>;
    /// Install an APK through the device package manager.
    async fn install(&self, serial: &str, apk: &Path) -> Result<Output>;
    /// Spawn a shell command on the device without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn stream(&self, serial: &str, command: &str, output: StreamOutput) -> Result<Self::Process>;
}

// ── Timing Port ───────────────────────────────────────────────────────────────

/// Abstracts sleeping so polling loops can be driven deterministically in tests.
pub trait Sleeper {
    /// Suspend for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations apply their configured default timeout, if any.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Spawn a program without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn(
        &self,
        program: &str,
        args: &[&str],
        output: StreamOutput,
    ) -> Result<tokio::process::Child>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait..
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the configuration file.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<DeployConfig>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory can be determined.
    fn path(&self) -> Result<PathBuf>;
}
