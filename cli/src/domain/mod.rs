//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod package;
pub mod request;

pub use config::{DeployConfig, validate_config};
pub use device::{DeviceDescriptor, DeviceHandle, DeviceState, resolve_device};
pub use error::{ConfigError, DeployError};
pub use package::PackageName;
pub use request::{DeployRequest, Strategy};
