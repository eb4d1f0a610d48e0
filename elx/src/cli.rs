// elx/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use elx_common::error::Result;
use elx_common::Config;
use elx_core::Manager;

pub mod install;
pub mod latest;
pub mod list;
pub mod start;
pub mod uninstall;

use crate::cli::install::InstallArgs;
use crate::cli::latest::Latest;
use crate::cli::list::List;
use crate::cli::start::StartArgs;
use crate::cli::uninstall::Uninstall;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "elx", bin_name = "elx")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Installation directory to manage instead of the configured one
    #[arg(long, global = true, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the latest Electron release unless it is already present
    Install(InstallArgs),
    /// Re-check the latest release and install it if it differs
    Upgrade(InstallArgs),
    /// Show the Electron executable that would be launched
    List(List),
    /// Print the latest published Electron version
    Latest(Latest),
    /// Launch the installed Electron executable
    Start(StartArgs),
    /// Remove every Electron install from the installation directory
    Uninstall(Uninstall),
}

impl Command {
    pub async fn run(&self, config: Config) -> Result<()> {
        match self {
            Self::Install(command) => command.run(config, false).await,
            Self::Upgrade(command) => command.run(config, true).await,
            Self::List(command) => command.run(config).await,
            Self::Latest(command) => command.run(config).await,
            Self::Start(command) => command.run(config).await,
            Self::Uninstall(command) => command.run(config).await,
        }
    }
}

/// Manager over the current process environment.
pub fn manager_for(config: Config) -> Result<Manager> {
    Manager::new(config, std::env::vars().collect())
}
