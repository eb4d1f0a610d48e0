// elx-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::error::{ElxError, Result};

const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org/electron/latest";
const DEFAULT_RELEASES_API_URL: &str =
    "https://api.github.com/repos/electron/electron/releases/latest";
const DEFAULT_RELEASE_HOST: &str = "https://github.com";
const DEFAULT_RELEASE_REPO: &str = "electron/electron";
const DEFAULT_GLOBAL_COMMAND: &str = "electron";
const DEFAULT_DOWNLOAD_ATTEMPTS: u32 = 3;
const PRIMARY_TIMEOUT_SECS: u64 = 5;
const FALLBACK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub install_dir: PathBuf,
    pub registry_url: String,
    pub releases_api_url: String,
    pub release_host: String,
    pub release_repo: String,
    pub primary_timeout: Duration,
    pub fallback_timeout: Duration,
    pub download_attempts: u32,
    /// Value of `npm_config_platform`, overrides the detected OS for the
    /// executable sub-path.
    pub platform_override: Option<String>,
    pub global_command: String,
    pub applications_dir: PathBuf,
    pub require_https: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading elx configuration");
        Self::load_from(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let install_dir = match non_empty("ELX_INSTALL_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let data_dir = dirs::data_dir().ok_or_else(|| {
                    ElxError::Config(
                        "Could not determine a data directory; set ELX_INSTALL_DIR".to_string(),
                    )
                })?;
                data_dir.join("elx").join("electron")
            }
        };
        debug!("Effective install dir set to: {}", install_dir.display());

        let download_attempts = match non_empty("ELX_DOWNLOAD_ATTEMPTS") {
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ElxError::Config(format!(
                    "ELX_DOWNLOAD_ATTEMPTS must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_DOWNLOAD_ATTEMPTS,
        };

        let mut config = Self::defaults(install_dir);
        config.download_attempts = download_attempts;
        config.platform_override = non_empty("npm_config_platform");
        config.require_https = !lookup("ELX_ALLOW_HTTP").is_some_and(|v| v == "1");
        if let Some(url) = non_empty("ELX_REGISTRY_URL") {
            config.registry_url = url;
        }
        if let Some(url) = non_empty("ELX_RELEASES_API_URL") {
            config.releases_api_url = url;
        }
        if let Some(host) = non_empty("ELX_RELEASE_HOST") {
            config.release_host = host.trim_end_matches('/').to_string();
        }

        debug!("Configuration loaded successfully.");
        Ok(config)
    }

    /// Defaults with an explicit installation directory and no environment input.
    pub fn with_install_dir(install_dir: impl Into<PathBuf>) -> Self {
        Self::defaults(install_dir.into())
    }

    fn defaults(install_dir: PathBuf) -> Self {
        Self {
            install_dir,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            releases_api_url: DEFAULT_RELEASES_API_URL.to_string(),
            release_host: DEFAULT_RELEASE_HOST.to_string(),
            release_repo: DEFAULT_RELEASE_REPO.to_string(),
            primary_timeout: Duration::from_secs(PRIMARY_TIMEOUT_SECS),
            fallback_timeout: Duration::from_secs(FALLBACK_TIMEOUT_SECS),
            download_attempts: DEFAULT_DOWNLOAD_ATTEMPTS,
            platform_override: None,
            global_command: DEFAULT_GLOBAL_COMMAND.to_string(),
            applications_dir: PathBuf::from("/Applications"),
            require_https: true,
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn logs_dir(&self) -> PathBuf {
        match self.install_dir.parent() {
            Some(parent) => parent.join("logs"),
            None => self.install_dir.join("logs"),
        }
    }

    /// Platform family used to pick the executable sub-path.
    pub fn platform_family(&self) -> String {
        self.platform_override
            .clone()
            .unwrap_or_else(|| crate::platform::host_platform().to_string())
    }
}
