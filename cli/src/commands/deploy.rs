//! Deploy command: push an APK to a device by install or by root mount.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::application::services::deploy::Deployer;
use crate::domain::{DeployRequest, Strategy};
use crate::infra::clock::TokioSleeper;
use crate::output::TerminalReporter;

/// Arguments for the deploy command.
#[derive(Args)]
pub struct DeployArgs {
    /// APK file to deploy
    #[arg(long, short = 'a', value_name = "PATH")]
    pub apk: PathBuf,

    /// Package name of the app, e.g. com.google.android.youtube
    #[arg(long, short = 'p', value_name = "PACKAGE")]
    pub package: String,

    /// Serial of the target device (see `apkdeploy devices`)
    #[arg(long, short = 'd', env = "ANDROID_SERIAL", value_name = "SERIAL")]
    pub device: String,

    /// Install with the package manager instead of mounting (no root needed)
    #[arg(long, short = 'i')]
    pub install: bool,

    /// Hide the app log while waiting for the app to exit
    #[arg(long)]
    pub no_logging: bool,
}

impl DeployArgs {
    /// Build the deployment request these arguments describe.
    ///
    /// # Errors
    ///
    /// Returns an error if the APK does not exist or the package name is
    /// invalid.
    pub fn to_request(&self) -> Result<DeployRequest> {
        anyhow::ensure!(
            self.apk.is_file(),
            "APK not found: {}",
            self.apk.display()
        );
        Ok(DeployRequest::new(
            self.apk.clone(),
            &self.package,
            self.device.clone(),
            Strategy::from_install_flag(self.install),
            !self.no_logging,
        )?)
    }
}

/// Run the deploy command.
///
/// Ctrl-C while the app log is being followed stops supervision.
///
/// # Errors
///
/// Returns an error if the request is invalid, the device cannot be
/// prepared, or any deployment step fails.
pub async fn run(app: &AppContext, args: &DeployArgs) -> Result<()> {
    let request = args.to_request()?;
    let reporter = TerminalReporter::new(&app.output);
    let deployer = Deployer::connect(&app.bridge, &reporter, request).await?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = deployer
        .deploy(&TokioSleeper, &app.config.supervisor, &cancel)
        .await;
    on_ctrl_c.abort();
    result
}
