// elx-common/src/platform.rs
//! Platform and architecture identifiers as used by Electron release assets.

use std::env::consts;

use crate::error::{ElxError, Result};

/// Release platform id of the running host (`darwin`, `win32`, `linux`, ...).
pub fn host_platform() -> &'static str {
    platform_id(consts::OS)
}

/// Release architecture id of the running host (`x64`, `arm64`, ...).
pub fn host_arch() -> &'static str {
    arch_id(consts::ARCH)
}

pub fn is_macos_host() -> bool {
    cfg!(target_os = "macos")
}

fn platform_id(os: &'static str) -> &'static str {
    match os {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

fn arch_id(arch: &'static str) -> &'static str {
    match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        "arm" => "armv7l",
        other => other,
    }
}

/// Relative path of the Electron binary inside an extracted install root.
pub fn platform_executable(platform: &str) -> Result<&'static str> {
    match platform {
        "mas" | "darwin" => Ok("Electron.app/Contents/MacOS/Electron"),
        "freebsd" | "openbsd" | "linux" => Ok("electron"),
        "win32" => Ok("electron.exe"),
        other => Err(ElxError::UnsupportedPlatform(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_rust_consts_to_release_ids() {
        assert_eq!(platform_id("macos"), "darwin");
        assert_eq!(platform_id("windows"), "win32");
        assert_eq!(platform_id("linux"), "linux");
        assert_eq!(arch_id("x86_64"), "x64");
        assert_eq!(arch_id("aarch64"), "arm64");
        assert_eq!(arch_id("x86"), "ia32");
    }

    #[test]
    fn executable_sub_paths() {
        assert_eq!(
            platform_executable("darwin").unwrap(),
            "Electron.app/Contents/MacOS/Electron"
        );
        assert_eq!(
            platform_executable("mas").unwrap(),
            platform_executable("darwin").unwrap()
        );
        assert_eq!(platform_executable("linux").unwrap(), "electron");
        assert_eq!(platform_executable("openbsd").unwrap(), "electron");
        assert_eq!(platform_executable("win32").unwrap(), "electron.exe");
    }

    #[test]
    fn unsupported_platform_fails_fast() {
        assert!(matches!(
            platform_executable("sunos"),
            Err(ElxError::UnsupportedPlatform(p)) if p == "sunos"
        ));
    }
}
