use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Prefix shared by every extracted install root (`electron-<version>-<platform>-<arch>`).
pub const INSTALL_ROOT_PREFIX: &str = "electron-";
const INSTALL_ROOT_SUFFIX: &str = "64";

/// An executable that answered a version probe with `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedExecutable {
    pub version: String,
    pub path: PathBuf,
}

impl ResolvedExecutable {
    pub fn new(version: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            version: version.into(),
            path: path.into(),
        }
    }
}

/// Whether a directory entry name follows the install-root naming convention.
/// Case-sensitive; only 64-bit builds are recognised.
pub fn is_install_root(name: &str) -> bool {
    name.starts_with(INSTALL_ROOT_PREFIX) && name.ends_with(INSTALL_ROOT_SUFFIX)
}
