// elx-core/src/install/mod.rs
pub mod lock;
pub mod reporter;

use std::sync::Arc;

use elx_common::config::Config;
use elx_common::error::{ElxError, Result};
use elx_common::model::{is_install_root, versions_equal, DownloadDescriptor, ResolvedExecutable};
use elx_common::platform::{host_arch, host_platform, platform_executable};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

pub use self::lock::install_lock;
pub use self::reporter::{InstallReporter, SilentReporter};
use crate::locate::ExecutableLocator;

/// What `ensure` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The requested version was already resolvable; nothing was touched.
    AlreadyInstalled(ResolvedExecutable),
    /// A fresh copy was downloaded and extracted.
    Installed(ResolvedExecutable),
}

impl EnsureOutcome {
    pub fn executable(&self) -> &ResolvedExecutable {
        match self {
            EnsureOutcome::AlreadyInstalled(exe) | EnsureOutcome::Installed(exe) => exe,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Installer {
    config: Arc<Config>,
    locator: ExecutableLocator,
    client: Client,
}

impl Installer {
    pub fn new(config: Arc<Config>, locator: ExecutableLocator, client: Client) -> Self {
        Self {
            config,
            locator,
            client,
        }
    }

    /// Makes `target_version` the installed version, downloading it if needed.
    ///
    /// Holds the installation-directory lock for the whole compare, purge,
    /// download and extract sequence.
    #[instrument(skip(self, reporter, cancel), fields(install_dir = %self.config.install_dir().display()))]
    pub async fn ensure(
        &self,
        target_version: &str,
        reporter: &dyn InstallReporter,
        cancel: &CancellationToken,
    ) -> Result<EnsureOutcome> {
        let lock = install_lock(self.config.install_dir());
        let _guard = lock.lock().await;

        if let Some(current) = self.locator.current().await {
            if versions_equal(&current.version, target_version) {
                debug!(
                    "Electron {} already available at {}",
                    current.version,
                    current.path.display()
                );
                return Ok(EnsureOutcome::AlreadyInstalled(current));
            }
            debug!(
                "Installed Electron {} differs from target {}",
                current.version, target_version
            );
        } else {
            debug!("Electron version not installed");
        }

        info!("Cleaning install dir before installing Electron {}", target_version);
        if let Err(e) = self.purge().await {
            warn!("Purge of install dir incomplete, continuing: {}", e);
        }

        let sub_path = platform_executable(&self.config.platform_family())?;
        let descriptor =
            DownloadDescriptor::new(&self.config, target_version, host_platform(), host_arch());
        let install_dir = self.config.install_dir();

        let archive_path = elx_net::download_archive(
            &self.client,
            &descriptor,
            install_dir,
            self.config.download_attempts,
            self.config.require_https,
            cancel,
            |progress| reporter.progress(progress.loaded_mb, progress.total_mb),
        )
        .await?;
        debug!("Downloaded {}", descriptor.file_name);

        if cancel.is_cancelled() {
            return Err(ElxError::Cancelled(format!(
                "install of {} before extraction",
                descriptor.file_name
            )));
        }

        reporter.message("Extracting...");
        let extract_dir = install_dir.join(descriptor.extract_dir_name());
        if let Err(e) = elx_aio::extract_zip_async(&archive_path, &extract_dir).await {
            error!("Extraction of {} failed: {}", archive_path.display(), e);
            // download_archive reuses whatever is left at this path.
            elx_aio::remove_file_best_effort(&archive_path).await;
            if let Err(remove_err) = elx_aio::remove_path_async(&extract_dir).await {
                warn!(
                    "Failed to remove partial install {}: {}",
                    extract_dir.display(),
                    remove_err
                );
            }
            return Err(e);
        }
        debug!("Extraction complete, deleting {}", archive_path.display());

        elx_aio::remove_file_best_effort(&archive_path).await;

        let executable = ResolvedExecutable::new(target_version, extract_dir.join(sub_path));
        info!(
            "Installed Electron {} at {}",
            executable.version,
            executable.path.display()
        );
        Ok(EnsureOutcome::Installed(executable))
    }

    /// Removes every install root from the installation directory.
    ///
    /// Every entry is attempted; the first failure is returned afterwards.
    /// Callers are expected to hold [`install_lock`].
    pub async fn purge(&self) -> Result<usize> {
        let install_dir = self.config.install_dir();
        let entries = match elx_aio::list_directory_entries(install_dir).await {
            Ok(entries) => entries,
            Err(_) if !install_dir.exists() => {
                debug!("Install dir {} does not exist yet", install_dir.display());
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        let mut first_error: Option<ElxError> = None;
        for (name, path, _) in entries.into_iter().filter(|(name, _, _)| is_install_root(name)) {
            match elx_aio::remove_path_async(&path).await {
                Ok(()) => {
                    debug!("Removed install root {}", name);
                    removed += 1;
                }
                Err(e) => {
                    warn!("Failed to remove install root {}: {}", name, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }
}
