use clap::Args;
use elx_common::config::Config;
use elx_common::error::Result;

use crate::cli::manager_for;

#[derive(Args, Debug)]
pub struct Latest;

impl Latest {
    pub async fn run(&self, config: Config) -> Result<()> {
        let version = manager_for(config)?.latest_version().await?;
        println!("{version}");
        Ok(())
    }
}
