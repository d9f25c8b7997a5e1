//! Deployment use-case: resolve the device, check preconditions, then install
//! directly or mount over the installed app and supervise its log.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::process::Output;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{DeviceBridge, ProgressReporter, Sleeper, StreamOutput};
use crate::application::services::log_supervisor::LogSupervisor;
use crate::domain::commands::{self, CommandTemplate};
use crate::domain::config::SupervisorConfig;
use crate::domain::{DeployError, DeployRequest, DeviceHandle, Strategy, resolve_device};

/// A deployment bound to one resolved device.
///
/// Construction resolves the device and, for [`Strategy::Mount`], checks for
/// root. Nothing is written to the device until [`Deployer::deploy`].
pub struct Deployer<'a, B, R> {
    bridge: &'a B,
    reporter: &'a R,
    request: DeployRequest,
    device: DeviceHandle,
}

impl<'a, B: DeviceBridge, R: ProgressReporter> Deployer<'a, B, R> {
    /// Resolve the requested device and check strategy preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::DeviceNotFound`] if exactly one connected device
    /// does not match, [`DeployError::RootRequired`] if the mount strategy was
    /// requested and the root probe fails, or a transport error.
    pub async fn connect(bridge: &'a B, reporter: &'a R, request: DeployRequest) -> Result<Self> {
        let devices = bridge.devices().await.context("enumerating devices")?;
        let device = resolve_device(&devices, request.device())?;
        tracing::debug!(device = device.serial(), strategy = ?request.strategy(), "device resolved");

        if request.strategy().requires_root() {
            let probe = bridge
                .shell(device.serial(), commands::ROOT_PROBE)
                .await
                .with_context(|| format!("probing root on {}", device.serial()))?;
            if !probe.status.success() {
                return Err(DeployError::RootRequired {
                    device: device.serial().to_string(),
                }
                .into());
            }
        }

        Ok(Self {
            bridge,
            reporter,
            request,
            device,
        })
    }

    #[must_use]
    pub fn device(&self) -> &DeviceHandle {
        &self.device
    }

    #[must_use]
    pub fn request(&self) -> &DeployRequest {
        &self.request
    }

    /// Run the deployment to completion.
    ///
    /// For the mount strategy this holds until the app process exits, with
    /// the log forwarded to this process when logging is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::RemoteCommandFailed`] for the first step that
    /// fails, or the log supervisor's error.
    pub async fn deploy<S: Sleeper>(
        &self,
        sleeper: &S,
        timing: &SupervisorConfig,
        cancel: &CancellationToken,
    ) -> Result<()> {
        match self.request.strategy() {
            Strategy::Install => self.install().await,
            Strategy::Mount => {
                self.mount().await?;
                self.supervise(sleeper, timing, cancel).await
            }
        }
    }

    async fn install(&self) -> Result<()> {
        self.reporter.step("installing without mounting...");
        let output = self
            .bridge
            .install(self.device.serial(), self.request.apk())
            .await
            .with_context(|| format!("installing on {}", self.device.serial()))?;
        if install_rejected(&output) {
            return Err(self.failure("install", &output));
        }
        self.reporter
            .success(&format!("installed {}", self.request.package()));
        Ok(())
    }

    async fn mount(&self) -> Result<()> {
        let serial = self.device.serial();
        self.reporter.step("installing by mounting...");

        let output = self
            .bridge
            .push(serial, self.request.apk(), commands::STAGING_PATH)
            .await
            .with_context(|| format!("pushing apk to {serial}"))?;
        self.check("push apk", &output)?;

        self.run_checked("create working directory", commands::CREATE_DIR)
            .await?;
        self.run_checked("prepare mount", commands::PREPARE_MOUNT)
            .await?;

        self.stage_script("push mount script", commands::MOUNT_SCRIPT)
            .await?;
        self.run_checked("install mount script", commands::INSTALL_MOUNT)
            .await?;

        self.stage_script("push unmount script", commands::UNMOUNT_SCRIPT)
            .await?;
        self.run_checked("install unmount script", commands::INSTALL_UNMOUNT)
            .await?;

        // A stale mount from an earlier deploy would stack under the new one.
        // The script exits 0 when nothing is mounted and prints each target
        // it unmounted.
        let unmount = self.run_root(commands::UNMOUNT).await?;
        self.check("unmount", &unmount)?;
        if !String::from_utf8_lossy(&unmount.stdout).trim().is_empty() {
            self.reporter.warn(&format!(
                "removed a stale mount of {}",
                self.request.package()
            ));
        }
        self.run_checked("mount", commands::MOUNT).await?;
        self.reporter
            .success(&format!("mounted {}", self.request.package()));

        self.run_checked("restart app", commands::RESTART).await?;
        self.reporter.success("app restarted");
        Ok(())
    }

    async fn supervise<S: Sleeper>(
        &self,
        sleeper: &S,
        timing: &SupervisorConfig,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let output = if self.request.logging() {
            StreamOutput::Inherit
        } else {
            StreamOutput::Discard
        };
        LogSupervisor::new(self.bridge, sleeper, timing.clone(), cancel.clone())
            .run(&self.device, self.request.package(), output)
            .await?;
        self.reporter
            .success("stopped logging because the app was closed");
        Ok(())
    }

    async fn stage_script(&self, step: &str, script: CommandTemplate) -> Result<()> {
        let serial = self.device.serial();
        let body = script.resolve(self.request.package());
        let output = self
            .bridge
            .create_file(serial, commands::STAGING_PATH, &body)
            .await
            .with_context(|| format!("{step} on {serial}"))?;
        self.check(step, &output)
    }

    async fn run_root(&self, template: CommandTemplate) -> Result<Output> {
        let serial = self.device.serial();
        let command = commands::as_root(&template.resolve(self.request.package()));
        tracing::debug!(device = serial, %command, "running");
        self.bridge
            .shell(serial, &command)
            .await
            .with_context(|| format!("running command on {serial}"))
    }

    async fn run_checked(&self, step: &str, template: CommandTemplate) -> Result<()> {
        let output = self.run_root(template).await?;
        self.check(step, &output)
    }

    fn check(&self, step: &str, output: &Output) -> Result<()> {
        if output.status.success() {
            Ok(())
        } else {
            Err(self.failure(step, output))
        }
    }

    fn failure(&self, step: &str, output: &Output) -> anyhow::Error {
        DeployError::RemoteCommandFailed {
            device: self.device.serial().to_string(),
            step: step.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into()
    }
}

/// Older adb releases exit 0 and print `Failure [REASON]` on stdout.
fn install_rejected(output: &Output) -> bool {
    !output.status.success() || String::from_utf8_lossy(&output.stdout).contains("Failure [")
}
