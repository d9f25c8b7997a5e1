//! Infrastructure implementation of the `DeviceBridge` port over the `adb` CLI.
//!
//! `AdbBridge<R>` routes every adb invocation through a `CommandRunner`, so
//! tests can inject a mock runner without spawning real processes.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::application::ports::{CommandRunner, DeviceBridge, LogProcess, StreamOutput};
use crate::domain::DeviceDescriptor;
use crate::domain::device::parse_devices_output;
use crate::infra::command_runner::TokioCommandRunner;

/// Infrastructure adapter that drives a device through the `adb` binary.
pub struct AdbBridge<R: CommandRunner> {
    runner: R,
    adb: String,
}

impl<R: CommandRunner> AdbBridge<R> {
    /// Create a bridge invoking `adb` (a name on `PATH` or a full path).
    pub fn new(runner: R, adb: impl Into<String>) -> Self {
        Self {
            runner,
            adb: adb.into(),
        }
    }

    async fn adb(&self, serial: &str, args: &[&str]) -> Result<Output> {
        let mut full = vec!["-s", serial];
        full.extend_from_slice(args);
        tracing::debug!(adb = %self.adb, args = ?full, "adb");
        self.runner.run(&self.adb, &full).await
    }
}

impl AdbBridge<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn from_config(config: &crate::domain::config::AdbConfig) -> Self {
        Self::new(
            TokioCommandRunner::new(config.command_timeout()),
            config.path.clone(),
        )
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", path.display()))
}

impl<R: CommandRunner> DeviceBridge for AdbBridge<R> {
    type Process = AdbProcess;

    async fn devices(&self) -> Result<Vec<DeviceDescriptor>> {
        let output = self
            .runner
            .run(&self.adb, &["devices"])
            .await
            .context("adb devices")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("adb devices failed: {}", stderr.trim());
        }
        Ok(parse_devices_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    async fn shell(&self, serial: &str, command: &str) -> Result<Output> {
        self.adb(serial, &["shell", command])
            .await
            .context("adb shell")
    }

    async fn push(&self, serial: &str, local: &Path, remote: &str) -> Result<Output> {
        self.adb(serial, &["push", path_str(local)?, remote])
            .await
            .context("adb push")
    }

    async fn create_file(&self, serial: &str, remote: &str, content: &str) -> Result<Output> {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().context("creating temp file")?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.flush())
            .context("writing temp file")?;
        let local = path_str(file.path())?.to_string();
        self.adb(serial, &["push", &local, remote])
            .await
            .context("adb push")
    }

    async fn install(&self, serial: &str, apk: &Path) -> Result<Output> {
        self.adb(serial, &["install", "-r", path_str(apk)?])
            .await
            .context("adb install")
    }

    fn stream(&self, serial: &str, command: &str, output: StreamOutput) -> Result<AdbProcess> {
        tracing::debug!(adb = %self.adb, serial, command, ?output, "adb stream");
        let child = self
            .runner
            .spawn(&self.adb, &["-s", serial, "shell", command], output)
            .context("adb shell (stream)")?;
        Ok(AdbProcess::new(child))
    }
}

/// A local `adb shell` child process following a remote command.
///
/// Piped output is drained into a sink so the child never blocks on a full
/// pipe.
pub struct AdbProcess {
    child: tokio::process::Child,
    drains: Vec<JoinHandle<()>>,
}

impl AdbProcess {
    fn new(mut child: tokio::process::Child) -> Self {
        let mut drains = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            drains.push(tokio::spawn(async move {
                let _ = tokio::io::copy(&mut stdout, &mut tokio::io::sink()).await;
            }));
        }
        if let Some(mut stderr) = child.stderr.take() {
            drains.push(tokio::spawn(async move {
                let _ = tokio::io::copy(&mut stderr, &mut tokio::io::sink()).await;
            }));
        }
        Self { child, drains }
    }
}

impl LogProcess for AdbProcess {
    async fn wait(&mut self) -> Result<()> {
        self.child.wait().await.context("waiting for log stream")?;
        Ok(())
    }

    async fn kill(&mut self) -> Result<()> {
        for drain in self.drains.drain(..) {
            drain.abort();
        }
        self.child.kill().await.context("killing log stream")
    }
}
