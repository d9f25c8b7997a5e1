//! Device descriptors and device resolution.
//!
//! Pure functions only: parsing `adb devices` output and matching a
//! requested serial against one enumeration snapshot.

use serde::Serialize;

use crate::domain::error::DeployError;

/// Connection state reported by `adb devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    /// Connected and authorized.
    Device,
    Offline,
    Unauthorized,
    Recovery,
    Sideload,
    /// Any state string this tool does not know about.
    Other(String),
}

impl DeviceState {
    fn from_adb(raw: &str) -> Self {
        match raw {
            "device" => Self::Device,
            "offline" => Self::Offline,
            "unauthorized" => Self::Unauthorized,
            "recovery" => Self::Recovery,
            "sideload" => Self::Sideload,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Device => "device",
            Self::Offline => "offline",
            Self::Unauthorized => "unauthorized",
            Self::Recovery => "recovery",
            Self::Sideload => "sideload",
            Self::Other(s) => s,
        }
    }
}

/// One entry of a device enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub serial: String,
    pub state: DeviceState,
}

impl DeviceDescriptor {
    /// Convenience constructor for a connected, authorized device.
    #[must_use]
    pub fn online(serial: &str) -> Self {
        Self {
            serial: serial.to_string(),
            state: DeviceState::Device,
        }
    }
}

/// A resolved target device. Only produced by [`resolve_device`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    serial: String,
}

impl DeviceHandle {
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }
}

/// Parse the stdout of `adb devices`.
///
/// The first line (`List of devices attached`) and daemon status lines
/// (`* daemon started successfully`) are skipped.
#[must_use]
pub fn parse_devices_output(stdout: &str) -> Vec<DeviceDescriptor> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('*'))
        .filter(|line| !line.starts_with("List of devices"))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let serial = parts.next()?;
            let state = parts.next()?;
            Some(DeviceDescriptor {
                serial: serial.to_string(),
                state: DeviceState::from_adb(state),
            })
        })
        .collect()
}

/// Resolve `name` against one snapshot of enumerated devices.
///
/// Exactly one connected (`device` state) entry must carry the serial.
///
/// # Errors
///
/// Returns [`DeployError::DeviceNotFound`] when zero or several entries
/// match.
pub fn resolve_device(
    devices: &[DeviceDescriptor],
    name: &str,
) -> Result<DeviceHandle, DeployError> {
    let mut matches = devices
        .iter()
        .filter(|d| d.state == DeviceState::Device && d.serial == name);
    match (matches.next(), matches.next()) {
        (Some(d), None) => Ok(DeviceHandle {
            serial: d.serial.clone(),
        }),
        _ => Err(DeployError::DeviceNotFound {
            device: name.to_string(),
        }),
    }
}
