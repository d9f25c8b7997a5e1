//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Deployment errors ─────────────────────────────────────────────────────────

/// Errors raised while connecting to a device or deploying to it.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error(
        "Invalid package name '{0}': expected dot-separated segments like com.example.app"
    )]
    InvalidPackage(String),

    #[error("No such device with name {device}. Run 'apkdeploy devices' to list devices.")]
    DeviceNotFound { device: String },

    #[error("Root required on {device}. Deploying failed. Use --install to deploy without root.")]
    RootRequired { device: String },

    #[error("{step} failed on {device} (exit code {code}){}", format_stderr(.stderr))]
    RemoteCommandFailed {
        device: String,
        step: String,
        code: i32,
        stderr: String,
    },

    #[error("An error occurred while monitoring the state of the app on {device}")]
    MonitoringFailed {
        device: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Log supervision on {device} was cancelled")]
    Cancelled { device: String },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
