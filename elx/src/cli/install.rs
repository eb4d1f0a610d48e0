use std::sync::Arc;

use clap::Args;
use colored::Colorize;
use elx_common::config::Config;
use elx_common::error::Result;
use elx_core::EnsureOutcome;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::manager_for;
use crate::ui::SpinnerReporter;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Do not draw the progress spinner
    #[arg(long)]
    pub quiet: bool,
}

impl InstallArgs {
    pub async fn run(&self, config: Config, upgrade: bool) -> Result<()> {
        let verb = if upgrade { "Upgrading" } else { "Installing" };
        let reporter = Arc::new(if self.quiet {
            SpinnerReporter::hidden()
        } else {
            SpinnerReporter::new(&format!("{verb} Electron..."))
        });
        let manager = manager_for(config)?.with_reporter(reporter.clone());

        let cancel = CancellationToken::new();
        let watcher = cancel.clone();
        let ctrl_c = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    debug!("Interrupt received, cancelling install");
                    watcher.cancel();
                }
                Err(e) => warn!("Failed to listen for interrupt: {}", e),
            }
        });

        let result = if upgrade {
            manager.upgrade(&cancel).await
        } else {
            manager.install(&cancel).await
        };
        ctrl_c.abort();
        reporter.finish();

        match result? {
            EnsureOutcome::AlreadyInstalled(exe) => {
                println!(
                    "{}Electron {} is already up to date ({})",
                    "==> ".bold().blue(),
                    exe.version.green(),
                    exe.path.display()
                );
            }
            EnsureOutcome::Installed(exe) => {
                println!(
                    "{}Installed Electron {} at {}",
                    "==> ".bold().blue(),
                    exe.version.green(),
                    exe.path.display()
                );
            }
        }
        Ok(())
    }
}
