use clap::Args;
use colored::Colorize;
use elx_common::config::Config;
use elx_common::error::Result;
use tracing::error;

use crate::cli::manager_for;

#[derive(Args, Debug)]
pub struct Uninstall;

impl Uninstall {
    pub async fn run(&self, config: Config) -> Result<()> {
        let install_dir = config.install_dir().to_path_buf();
        let manager = manager_for(config)?;
        println!("Uninstalling Electron from {}...", install_dir.display());

        match manager.uninstall().await {
            Ok(0) => println!("{}", "Nothing to uninstall".yellow()),
            Ok(count) => println!(
                "{}Removed {} Electron install(s)",
                "==> ".bold().blue(),
                count
            ),
            Err(e) => {
                error!("✖ Uninstall incomplete: {}", e);
                return Err(e);
            }
        }
        Ok(())
    }
}
