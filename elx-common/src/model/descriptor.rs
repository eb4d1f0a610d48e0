use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Where a release archive lives and what it is called once downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    pub url: String,
    pub file_name: String,
}

impl DownloadDescriptor {
    /// `<host>/<repo>/releases/download/<version>/electron-<version>-<platform>-<arch>.zip`.
    /// The version is used verbatim in both the path and the file name.
    pub fn new(config: &Config, version: &str, platform: &str, arch: &str) -> Self {
        let file_name = format!("electron-{version}-{platform}-{arch}.zip");
        let url = format!(
            "{}/{}/releases/download/{}/{}",
            config.release_host.trim_end_matches('/'),
            config.release_repo,
            version,
            file_name
        );
        Self { url, file_name }
    }

    /// Directory name the archive extracts into: the file name minus `.zip`.
    pub fn extract_dir_name(&self) -> &str {
        self.file_name
            .strip_suffix(".zip")
            .unwrap_or(self.file_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_github_release_url() {
        let config = Config::with_install_dir("/tmp/elx");
        let descriptor = DownloadDescriptor::new(&config, "28.0.0", "linux", "x64");
        assert_eq!(descriptor.file_name, "electron-28.0.0-linux-x64.zip");
        assert_eq!(
            descriptor.url,
            "https://github.com/electron/electron/releases/download/28.0.0/electron-28.0.0-linux-x64.zip"
        );
        assert_eq!(descriptor.extract_dir_name(), "electron-28.0.0-linux-x64");
    }

    #[test]
    fn keeps_tag_prefix_verbatim() {
        let config = Config::with_install_dir("/tmp/elx");
        let descriptor = DownloadDescriptor::new(&config, "v28.0.1", "darwin", "arm64");
        assert!(descriptor
            .url
            .ends_with("/download/v28.0.1/electron-v28.0.1-darwin-arm64.zip"));
    }
}
