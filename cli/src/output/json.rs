//! JSON output helpers.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::DeviceDescriptor;

/// Format a JSON error object for `--json` code paths.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format the device list as a JSON array.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_devices(devices: &[DeviceDescriptor]) -> Result<String> {
    serde_json::to_string_pretty(devices).context("JSON serialization failed")
}

/// Format any serializable value, pretty-printed.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_value<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Stable machine-readable code for an error, used in `--json` output.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::DeployError;

    match err.downcast_ref::<DeployError>() {
        Some(DeployError::InvalidPackage(_)) => "INVALID_PACKAGE",
        Some(DeployError::DeviceNotFound { .. }) => "DEVICE_NOT_FOUND",
        Some(DeployError::RootRequired { .. }) => "ROOT_REQUIRED",
        Some(DeployError::RemoteCommandFailed { .. }) => "REMOTE_COMMAND_FAILED",
        Some(DeployError::MonitoringFailed { .. }) => "MONITORING_FAILED",
        Some(DeployError::Cancelled { .. }) => "CANCELLED",
        None => "ERROR",
    }
}
