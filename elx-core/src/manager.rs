// elx-core/src/manager.rs
use std::collections::HashMap;
use std::sync::Arc;

use elx_common::config::Config;
use elx_common::env::sanitize_env;
use elx_common::error::Result;
use elx_common::model::ResolvedExecutable;
use elx_net::VersionResolver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::install::{install_lock, EnsureOutcome, InstallReporter, Installer, SilentReporter};
use crate::locate::ExecutableLocator;
use crate::process::{ProcessController, ProcessHandle};

/// Shown to the user whenever an install or upgrade cannot complete.
pub const CONNECTIVITY_ERROR_MESSAGE: &str =
    "Cannot fetch resources, make sure you are connected to internet and try again.";

/// Entry point tying version lookup, discovery, installation and the
/// launched process together for one installation directory.
pub struct Manager {
    config: Arc<Config>,
    env: Arc<HashMap<String, String>>,
    resolver: VersionResolver,
    locator: ExecutableLocator,
    installer: Installer,
    processes: ProcessController,
    reporter: Arc<dyn InstallReporter>,
}

impl Manager {
    /// `env` is sanitized once here and used for every probe and launch.
    pub fn new(config: Config, env: HashMap<String, String>) -> Result<Self> {
        let config = Arc::new(config);
        let env = Arc::new(sanitize_env(env));
        let client = elx_net::build_http_client()?;

        let resolver = VersionResolver::with_client(&config, client.clone());
        let locator = ExecutableLocator::new(config.clone(), env.clone());
        let installer = Installer::new(config.clone(), locator.clone(), client);

        debug!(
            "Manager ready for install dir {}",
            config.install_dir().display()
        );
        Ok(Self {
            config,
            env,
            resolver,
            locator,
            installer,
            processes: ProcessController::new(),
            reporter: Arc::new(SilentReporter),
        })
    }

    /// Configuration and environment taken from the running process.
    pub fn from_current_env() -> Result<Self> {
        Self::new(Config::load()?, std::env::vars().collect())
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn InstallReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    pub async fn latest_version(&self) -> Result<String> {
        self.resolver.latest().await
    }

    /// Installs the latest published version unless it is already present.
    pub async fn install(&self, cancel: &CancellationToken) -> Result<EnsureOutcome> {
        let version = match self.resolver.latest().await {
            Ok(version) => version,
            Err(e) => {
                error!("Failed to resolve latest Electron version: {}", e);
                self.reporter.error(CONNECTIVITY_ERROR_MESSAGE);
                return Err(e);
            }
        };
        info!("Latest Electron version is {}", version);

        match self
            .installer
            .ensure(&version, self.reporter.as_ref(), cancel)
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_cancelled() => {
                info!("Electron install cancelled");
                Err(e)
            }
            Err(e) => {
                error!("Failed to install Electron {}: {}", version, e);
                self.reporter.error(CONNECTIVITY_ERROR_MESSAGE);
                Err(e)
            }
        }
    }

    /// Same as [`Manager::install`]: always re-checks the latest version.
    pub async fn upgrade(&self, cancel: &CancellationToken) -> Result<EnsureOutcome> {
        self.install(cancel).await
    }

    pub async fn get_installed(&self) -> Option<ResolvedExecutable> {
        self.locator.current().await
    }

    /// Removes every install root. The outcome is returned, never raised as
    /// a panic, and every entry is attempted even after a failure.
    pub async fn uninstall(&self) -> Result<usize> {
        let lock = install_lock(self.config.install_dir());
        let _guard = lock.lock().await;
        let outcome = self.installer.purge().await;
        match &outcome {
            Ok(count) => info!("Removed {} Electron install(s)", count),
            Err(e) => warn!("Uninstall incomplete: {}", e),
        }
        outcome
    }

    /// Launches the installed executable. `Ok(None)` when nothing is installed.
    pub async fn start(
        &self,
        entry_file: Option<&str>,
        args: &[String],
    ) -> Result<Option<ProcessHandle>> {
        let Some(executable) = self.get_installed().await else {
            info!("No Electron executable found, nothing to start");
            return Ok(None);
        };
        debug!(
            "Starting Electron {} from {}",
            executable.version,
            executable.path.display()
        );
        let handle = self
            .processes
            .start(&executable.path, entry_file, args, &self.env)
            .await?;
        Ok(Some(handle))
    }

    pub async fn stop(&self) -> Result<bool> {
        self.processes.stop().await
    }

    /// Resolves once the started process exits by itself.
    pub async fn wait_for_exit(&self) -> Result<Option<std::process::ExitStatus>> {
        self.processes.wait_for_exit().await
    }
}
