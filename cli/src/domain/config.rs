//! Domain types and validators for apkdeploy configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `<config dir>/apkdeploy/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DeployConfig {
    /// adb transport settings.
    pub adb: AdbConfig,
    /// Log supervision timing.
    pub supervisor: SupervisorConfig,
}

/// adb transport settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdbConfig {
    /// Path or name of the adb binary.
    pub path: String,
    /// Optional per-command timeout. `None` waits indefinitely.
    pub command_timeout_secs: Option<u64>,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            path: "adb".to_string(),
            command_timeout_secs: None,
        }
    }
}

impl AdbConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

/// Timing of the liveness poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Delay before the first liveness check, giving the app time to start.
    pub grace_period_ms: u64,
    /// Delay between liveness checks.
    pub poll_interval_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 500,
            poll_interval_ms: 1000,
        }
    }
}

impl SupervisorConfig {
    #[must_use]
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration.
///
/// # Errors
///
/// Returns an error if the adb path is empty, the poll interval is zero, or
/// the command timeout is zero.
pub fn validate_config(config: &DeployConfig) -> Result<()> {
    if config.adb.path.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "adb.path".to_string(),
            value: String::new(),
            hint: "Set it to the adb binary, e.g. 'adb' or '/opt/platform-tools/adb'.".to_string(),
        }
        .into());
    }
    if config.supervisor.poll_interval_ms == 0 {
        return Err(ConfigError::InvalidValue {
            key: "supervisor.poll_interval_ms".to_string(),
            value: "0".to_string(),
            hint: "The poll interval must be at least 1 millisecond.".to_string(),
        }
        .into());
    }
    if config.adb.command_timeout_secs == Some(0) {
        return Err(ConfigError::InvalidValue {
            key: "adb.command_timeout_secs".to_string(),
            value: "0".to_string(),
            hint: "Remove the key to disable the timeout.".to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
