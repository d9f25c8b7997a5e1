//! Deployment request value types.

use std::path::PathBuf;

use crate::domain::error::DeployError;
use crate::domain::package::PackageName;

/// How the APK reaches the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Hand the APK to the device package manager.
    Install,
    /// Bind-mount the APK over the installed app's base APK. Requires root.
    Mount,
}

impl Strategy {
    #[must_use]
    pub fn from_install_flag(install: bool) -> Self {
        if install { Self::Install } else { Self::Mount }
    }

    #[must_use]
    pub fn requires_root(self) -> bool {
        self == Self::Mount
    }
}

/// Everything the deployer needs, fixed for the lifetime of one deployment.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    apk: PathBuf,
    package: PackageName,
    device: String,
    strategy: Strategy,
    logging: bool,
}

impl DeployRequest {
    /// Build a request, validating the package identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidPackage`] if `package` is not a valid
    /// Android package name.
    pub fn new(
        apk: impl Into<PathBuf>,
        package: &str,
        device: impl Into<String>,
        strategy: Strategy,
        logging: bool,
    ) -> Result<Self, DeployError> {
        Ok(Self {
            apk: apk.into(),
            package: PackageName::parse(package)?,
            device: device.into(),
            strategy,
            logging,
        })
    }

    #[must_use]
    pub fn apk(&self) -> &std::path::Path {
        &self.apk
    }

    #[must_use]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn logging(&self) -> bool {
        self.logging
    }
}
