use clap::Args;
use colored::Colorize;
use elx_common::config::Config;
use elx_common::error::{ElxError, Result};
use tracing::{debug, warn};

use crate::cli::manager_for;

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Entry file passed to Electron before the remaining arguments
    #[arg(long, value_name = "FILE")]
    pub entry: Option<String>,

    /// Arguments forwarded to Electron (after `--`)
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl StartArgs {
    pub async fn run(&self, config: Config) -> Result<()> {
        let manager = manager_for(config)?;
        let Some(mut handle) = manager.start(self.entry.as_deref(), &self.args).await? else {
            return Err(ElxError::Generic(
                "Electron is not installed, run 'elx install' first".to_string(),
            ));
        };
        println!(
            "{}Started Electron (pid {})",
            "==> ".bold().blue(),
            handle.pid.map(|p| p.to_string()).unwrap_or_else(|| "?".to_string())
        );

        let mut forwards = Vec::new();
        if let Some(mut stdout) = handle.stdout.take() {
            forwards.push(tokio::spawn(async move {
                tokio::io::copy(&mut stdout, &mut tokio::io::stdout()).await
            }));
        }
        if let Some(mut stderr) = handle.stderr.take() {
            forwards.push(tokio::spawn(async move {
                tokio::io::copy(&mut stderr, &mut tokio::io::stderr()).await
            }));
        }

        let status = tokio::select! {
            status = manager.wait_for_exit() => status?,
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupt received, stopping Electron");
                manager.stop().await?;
                None
            }
        };

        for forward in forwards {
            match forward.await {
                Ok(Ok(bytes)) => debug!("Forwarded {} bytes of child output", bytes),
                Ok(Err(e)) => warn!("Failed to forward child output: {}", e),
                Err(e) => warn!("Output forwarding task failed: {}", e),
            }
        }
        drop(handle);

        match status {
            Some(status) if !status.success() => Err(ElxError::CommandExecError(format!(
                "Electron exited with {status}"
            ))),
            _ => Ok(()),
        }
    }
}
