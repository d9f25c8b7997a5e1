//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;
use crate::commands::config::ConfigCommand;
use crate::infra::config::YamlConfigStore;

/// Deploy APKs to Android devices by install or by root mount
#[derive(Parser)]
#[command(
    name = "apkdeploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print debug traces of every adb call to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy an APK to a device
    Deploy(commands::deploy::DeployArgs),

    /// List connected devices
    Devices,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        let flags = OutputFlags {
            no_color,
            quiet,
            json,
        };
        let store = YamlConfigStore;
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            Command::Deploy(args) => {
                let app = AppContext::new(&flags, &store)?;
                commands::deploy::run(&app, &args).await
            }
            Command::Devices => {
                let app = AppContext::new(&flags, &store)?;
                commands::devices::run(&app).await
            }
            Command::Config(ConfigCommand::Path) => commands::config::path(json, &store),
            Command::Config(ConfigCommand::Show) => {
                let app = AppContext::new(&flags, &store)?;
                commands::config::show(&app)
            }
        }
    }
}
