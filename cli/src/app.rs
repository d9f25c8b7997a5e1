//! Application context: unified state passed to every command handler.
//!
//! `AppContext` bundles the output context, the loaded configuration and the
//! adb bridge so command handlers do not construct them individually.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::DeployConfig;
use crate::infra::adb::AdbBridge;
use crate::infra::command_runner::TokioCommandRunner;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Whether JSON output was requested.
    pub json: bool,
    /// Effective configuration.
    pub config: DeployConfig,
    /// adb transport.
    pub bridge: AdbBridge<TokioCommandRunner>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be loaded.
    pub fn new(flags: &OutputFlags, store: &impl ConfigStore) -> Result<Self> {
        let config = store.load()?;
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            json: flags.json,
            bridge: AdbBridge::from_config(&config.adb),
            config,
        })
    }
}
