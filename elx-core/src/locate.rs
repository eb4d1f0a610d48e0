// elx-core/src/locate.rs
//! Discovery of an existing Electron executable, locally or on the system.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use elx_common::config::Config;
use elx_common::error::{ElxError, Result};
use elx_common::model::{is_install_root, ResolvedExecutable};
use elx_common::platform::{is_macos_host, platform_executable};
use tracing::{debug, warn};

const VERSION_FLAG: &str = "--version";

#[derive(Debug, Clone)]
pub struct ExecutableLocator {
    config: Arc<Config>,
    env: Arc<HashMap<String, String>>,
}

impl ExecutableLocator {
    pub fn new(config: Arc<Config>, env: Arc<HashMap<String, String>>) -> Self {
        Self { config, env }
    }

    /// Local install first, then whatever the system provides.
    pub async fn current(&self) -> Option<ResolvedExecutable> {
        if let Some(local) = self.local(self.config.install_dir()).await {
            return Some(local);
        }
        self.global().await
    }

    /// Finds the executable inside the first install root of `install_dir`.
    ///
    /// Several install roots can coexist; the lexicographically first one wins.
    pub async fn local(&self, install_dir: &Path) -> Option<ResolvedExecutable> {
        let entries = match elx_aio::list_directory_entries(install_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No local install ({})", e);
                return None;
            }
        };

        let (dir_name, _, _) = entries
            .into_iter()
            .find(|(name, _, _)| is_install_root(name))?;

        let sub_path = match platform_executable(&self.config.platform_family()) {
            Ok(sub_path) => sub_path,
            Err(e) => {
                warn!("Cannot locate local executable: {}", e);
                return None;
            }
        };

        let exec_path = install_dir.join(&dir_name).join(sub_path);
        let version = self.check_command(&exec_path).await?;
        Some(ResolvedExecutable::new(version, exec_path))
    }

    /// Probes the bare command on the system path, then on macOS hosts the
    /// bundle under the applications directory.
    pub async fn global(&self) -> Option<ResolvedExecutable> {
        let command = self.config.global_command.as_str();
        if let Some(version) = self.check_bare_command(command).await {
            return Some(ResolvedExecutable::new(version, PathBuf::from(command)));
        }

        if !is_macos_host() {
            return None;
        }

        let sub_path = platform_executable(&self.config.platform_family()).ok()?;
        let exec_path = self.config.applications_dir.join(sub_path);
        if !elx_aio::fs::is_regular_file(&exec_path).await {
            debug!("No application bundle at {}", exec_path.display());
            return None;
        }
        let version = self.check_command(&exec_path).await?;
        Some(ResolvedExecutable::new(version, exec_path))
    }

    /// Runs `<target> --version`. Any spawn failure or non-zero exit is `None`.
    pub async fn check_command(&self, target: impl AsRef<OsStr>) -> Option<String> {
        let target = target.as_ref();
        match self.probe(target).await {
            Ok(version) => {
                debug!("{:?} reports version {}", target, version);
                Some(version)
            }
            Err(e) => {
                debug!("Treating {:?} as not installed: {}", target, e);
                None
            }
        }
    }

    /// Like [`Self::check_command`] for a name looked up on the system path.
    /// On Windows the lookup goes through `cmd /C` so that PATHEXT shims
    /// such as npm's `electron.cmd` are found.
    async fn check_bare_command(&self, name: &str) -> Option<String> {
        let (program, args) = bare_command_invocation(name, cfg!(windows));
        match self.probe_with(OsStr::new(program), &args).await {
            Ok(version) => {
                debug!("{} reports version {}", name, version);
                Some(version)
            }
            Err(e) => {
                debug!("No usable {} on the system path: {}", name, e);
                None
            }
        }
    }

    async fn probe(&self, target: &OsStr) -> Result<String> {
        self.probe_with(target, &[VERSION_FLAG]).await
    }

    async fn probe_with(&self, program: &OsStr, args: &[&str]) -> Result<String> {
        let output = elx_aio::run_command_async(program, args, None, Some(self.env.as_ref()))
            .await
            .map_err(|e| ElxError::ProbeFailure(e.to_string()))?;
        if !output.status.success() {
            return Err(ElxError::ProbeFailure(format!(
                "{program:?} {args:?} exited with {}",
                output.status
            )));
        }
        Ok(normalize_version_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// Program and arguments used to ask a bare command for its version.
fn bare_command_invocation(name: &str, windows: bool) -> (&str, Vec<&str>) {
    if windows {
        ("cmd", vec!["/C", name, VERSION_FLAG])
    } else {
        (name, vec![VERSION_FLAG])
    }
}

/// Drops every line-ending character, then surrounding whitespace.
pub fn normalize_version_output(raw: &str) -> String {
    raw.replace(['\r', '\n'], "").trim().to_string()
}
