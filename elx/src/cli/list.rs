use clap::Args;
use colored::Colorize;
use elx_common::config::Config;
use elx_common::error::Result;

use crate::cli::manager_for;

#[derive(Args, Debug)]
pub struct List {
    /// Print the resolved executable as JSON
    #[arg(long)]
    pub json: bool,
}

impl List {
    pub async fn run(&self, config: Config) -> Result<()> {
        let manager = manager_for(config)?;
        let installed = manager.get_installed().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&installed)?);
            return Ok(());
        }

        match installed {
            Some(exe) => println!(
                "Electron {} {}",
                exe.version.green().bold(),
                exe.path.display()
            ),
            None => println!("{}", "Electron is not installed".yellow()),
        }
        Ok(())
    }
}
