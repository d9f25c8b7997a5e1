//! Log supervision: stream the app's log while polling whether it is alive.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{DeviceBridge, LogProcess, Sleeper, StreamOutput};
use crate::domain::commands;
use crate::domain::config::SupervisorConfig;
use crate::domain::{DeployError, DeviceHandle, PackageName};

/// A running log process and the worker task that owns it.
///
/// Dropping a `LogStream` without calling [`LogStream::shutdown`] still
/// signals the worker and aborts it, so the process never outlives the
/// stream.
pub struct LogStream {
    stop: CancellationToken,
    worker: Option<JoinHandle<Result<()>>>,
}

impl LogStream {
    /// Hand `process` to a dedicated worker task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<P: LogProcess>(mut process: P) -> Self {
        let stop = CancellationToken::new();
        let token = stop.clone();
        let worker = tokio::spawn(async move {
            let stopped = tokio::select! {
                () = token.cancelled() => true,
                exited = process.wait() => {
                    exited?;
                    false
                }
            };
            if stopped {
                process.kill().await?;
            }
            Ok::<(), anyhow::Error>(())
        });
        Self {
            stop,
            worker: Some(worker),
        }
    }

    /// Whether the worker has finished, either because the process exited on
    /// its own or because it was stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Kill the process and wait for the worker to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be killed or the worker
    /// panicked.
    pub async fn shutdown(mut self) -> Result<()> {
        self.stop.cancel();
        match self.worker.take() {
            Some(worker) => worker.await.context("log worker panicked")?,
            None => Ok(()),
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        self.stop.cancel();
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

/// Streams an app's log and holds until the app process is gone.
pub struct LogSupervisor<'a, B, S> {
    bridge: &'a B,
    sleeper: &'a S,
    timing: SupervisorConfig,
    cancel: CancellationToken,
}

impl<'a, B: DeviceBridge, S: Sleeper> LogSupervisor<'a, B, S> {
    pub fn new(
        bridge: &'a B,
        sleeper: &'a S,
        timing: SupervisorConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            bridge,
            sleeper,
            timing,
            cancel,
        }
    }

    /// Start the log stream, wait for `package` to stop running, then tear
    /// the stream down.
    ///
    /// The stream is released before any polling error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::MonitoringFailed`] if a liveness check cannot be
    /// run, [`DeployError::Cancelled`] if the token fires, or an error if the
    /// log process cannot be started or stopped.
    pub async fn run(
        &self,
        device: &DeviceHandle,
        package: &PackageName,
        output: StreamOutput,
    ) -> Result<()> {
        let command = commands::LOGCAT.resolve(package);
        let process = self
            .bridge
            .stream(device.serial(), &command, output)
            .with_context(|| format!("starting log stream on {}", device.serial()))?;
        let stream = LogStream::spawn(process);
        tracing::debug!(device = device.serial(), ?output, "log stream started");

        let watched = self.wait_for_exit(device, package).await;
        let released = stream.shutdown().await;
        tracing::debug!(device = device.serial(), "log stream stopped");

        watched?;
        released
    }

    /// Poll the pid lookup until it first reports failure.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::MonitoringFailed`] if the lookup cannot be run
    /// or [`DeployError::Cancelled`] if the token fires.
    pub async fn wait_for_exit(&self, device: &DeviceHandle, package: &PackageName) -> Result<()> {
        let lookup = commands::PID_OF.resolve(package);
        self.pause(self.timing.grace_period(), device).await?;

        loop {
            let result = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(cancelled(device)),
                result = self.bridge.shell(device.serial(), &lookup) => result,
            };
            let output = result.map_err(|e| DeployError::MonitoringFailed {
                device: device.serial().to_string(),
                source: e.into(),
            })?;
            if !output.status.success() {
                tracing::info!(device = device.serial(), %package, "app process exited");
                return Ok(());
            }
            self.pause(self.timing.poll_interval(), device).await?;
        }
    }

    async fn pause(&self, duration: std::time::Duration, device: &DeviceHandle) -> Result<()> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(cancelled(device)),
            () = self.sleeper.sleep(duration) => Ok(()),
        }
    }
}

fn cancelled(device: &DeviceHandle) -> anyhow::Error {
    DeployError::Cancelled {
        device: device.serial().to_string(),
    }
    .into()
}
