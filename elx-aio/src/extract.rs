// elx-aio/src/extract.rs
// Handles release archive extraction off the async runtime.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use elx_common::error::{ElxError, Result};
use tracing::{debug, warn};
use zip::ZipArchive;

#[cfg(unix)]
const S_IFMT: u32 = 0o170000;
#[cfg(unix)]
const S_IFLNK: u32 = 0o120000;

/// Extracts a zip archive into `target_dir`.
///
/// Every member is written as a plain file, including nested archives such as
/// `.asar` bundles, which are never looked into. Unix permission bits and
/// symlinks recorded in the archive are restored.
pub async fn extract_zip_async(archive_path: &Path, target_dir: &Path) -> Result<()> {
    debug!(
        "Extracting archive '{}' to '{}'",
        archive_path.display(),
        target_dir.display()
    );
    let archive_path = archive_path.to_path_buf();
    let target_dir = target_dir.to_path_buf();
    tokio::task::spawn_blocking(move || extract_zip(&archive_path, &target_dir))
        .await
        .map_err(|e| ElxError::ExtractError(format!("JoinError in ZIP extraction: {e}")))?
}

fn extract_zip(archive_path: &Path, target_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(target_dir).map_err(|e| {
        ElxError::ExtractError(format!(
            "Failed to create extraction dir {}: {}",
            target_dir.display(),
            e
        ))
    })?;

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
        ElxError::ExtractError(format!(
            "Failed to open ZIP {}: {}",
            archive_path.display(),
            e
        ))
    })?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ElxError::ExtractError(format!("Failed to access ZIP entry: {e}")))?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            ElxError::ExtractError(format!("Unsafe path in ZIP entry '{}'", entry.name()))
        })?;
        let outpath = target_dir.join(&relative);
        let mode = entry.unix_mode();

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| {
                ElxError::ExtractError(format!("Failed to create ZIP dir: {e}"))
            })?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ElxError::ExtractError(format!("Failed to create ZIP parent dir: {e}"))
            })?;
        }

        #[cfg(unix)]
        {
            if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
                let mut target = String::new();
                std::io::Read::read_to_string(&mut entry, &mut target).map_err(|e| {
                    ElxError::ExtractError(format!("Failed to read symlink target: {e}"))
                })?;
                write_symlink(&target, &outpath)?;
                continue;
            }
        }

        let mut outfile = File::create(&outpath)
            .map_err(|e| ElxError::ExtractError(format!("Failed to create ZIP file: {e}")))?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|e| ElxError::ExtractError(format!("Failed to write ZIP file: {e}")))?;
        drop(outfile);

        #[cfg(unix)]
        {
            if let Some(mode) = mode {
                use std::os::unix::fs::PermissionsExt;
                let perms = std::fs::Permissions::from_mode(mode & 0o7777);
                if let Err(e) = std::fs::set_permissions(&outpath, perms) {
                    warn!(
                        "Failed to set permissions on ZIP entry {}: {}",
                        outpath.display(),
                        e
                    );
                }
            }
        }
        #[cfg(not(unix))]
        let _ = mode;
    }

    debug!("Finished ZIP extraction for {}", archive_path.display());
    Ok(())
}

#[cfg(unix)]
fn write_symlink(target: &str, link: &Path) -> Result<()> {
    use std::path::{Component, PathBuf};

    let target = PathBuf::from(target);
    if target
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
    {
        warn!(
            "Skipping symlink {} with absolute target {}",
            link.display(),
            target.display()
        );
        return Ok(());
    }
    if link.symlink_metadata().is_ok() {
        std::fs::remove_file(link)?;
    }
    std::os::unix::fs::symlink(&target, link).map_err(|e| {
        ElxError::ExtractError(format!(
            "Failed to create symlink {} -> {}: {}",
            link.display(),
            target.display(),
            e
        ))
    })
}
