//! Config command: inspect the effective configuration.

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

/// Print the effective configuration.
///
/// # Errors
///
/// Returns an error if the config cannot be serialized.
pub fn show(app: &AppContext) -> Result<()> {
    if app.json {
        println!("{}", json::format_value(&app.config)?);
    } else {
        let yaml = serde_yaml::to_string(&app.config).context("cannot serialize config")?;
        print!("{yaml}");
    }
    Ok(())
}

/// Print the configuration file path.
///
/// Does not read the file, so it works even when the file is invalid.
///
/// # Errors
///
/// Returns an error if the config path cannot be determined.
pub fn path(json: bool, store: &impl ConfigStore) -> Result<()> {
    let path = store.path()?;
    if json {
        println!("{}", json::format_value(&serde_json::json!({ "path": path }))?);
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
