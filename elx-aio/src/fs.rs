/*
File: elx-aio/src/fs.rs
Purpose: Filesystem primitives used by discovery, purge and cleanup.
*/
use std::io;
use std::path::{Path, PathBuf};

use elx_common::error::{ElxError, Result};
use tokio::fs;
use tracing::{debug, error, warn};

/// Lists directory entries as `(name, path, is_dir)`, sorted by name.
/// Skips entries that cause errors during reading.
pub async fn list_directory_entries(dir_path: &Path) -> Result<Vec<(String, PathBuf, bool)>> {
    debug!("Listing directory entries for: {}", dir_path.display());
    let mut read_dir = fs::read_dir(dir_path).await.map_err(|e| {
        debug!("Failed to read directory {}: {}", dir_path.display(), e);
        ElxError::FilesystemError(format!(
            "Failed to read directory {}: {}",
            dir_path.display(),
            e
        ))
    })?;

    let mut entries = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();
                match entry.file_type().await {
                    Ok(file_type) => entries.push((name, path, file_type.is_dir())),
                    Err(e) => warn!(
                        "Failed to get file type for {} in {}: {}",
                        path.display(),
                        dir_path.display(),
                        e
                    ),
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Error reading entry in {}: {}", dir_path.display(), e);
                break;
            }
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Removes a filesystem path (file, symlink, or directory recursively).
/// A path that is already gone counts as removed.
pub async fn remove_path_async(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Nothing to remove at {}", path.display());
            return Ok(());
        }
        Err(e) => return Err(ElxError::from(e)),
    };

    let is_dir = metadata.file_type().is_dir();
    let path_type = if is_dir {
        "directory"
    } else if metadata.file_type().is_symlink() {
        "symlink"
    } else {
        "file"
    };
    debug!("Async Removing {} at: {}", path_type, path.display());

    let removed = if is_dir {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    match removed {
        Ok(()) => {
            debug!("Async Successfully removed {}: {}", path_type, path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            error!("Failed to remove {} {}: {}", path_type, path.display(), e);
            Err(ElxError::FilesystemError(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            )))
        }
    }
}

/// Removes a file, logging instead of propagating failure.
pub async fn remove_file_best_effort(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!("Removed {}", path.display());
            true
        }
        Err(e) => {
            warn!("Could not remove {}: {}", path.display(), e);
            false
        }
    }
}

/// Checks if a path points to a regular file (resolving symlinks).
pub async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_sorted_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("b-dir")).unwrap();
        std::fs::write(dir.path().join("a-file"), b"x").unwrap();

        let entries = list_directory_entries(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|(n, _, d)| (n.as_str(), *d)).collect();
        assert_eq!(names, vec![("a-file", false), ("b-dir", true)]);
    }

    #[tokio::test]
    async fn listing_missing_dir_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_directory_entries(&dir.path().join("missing")).await;
        assert!(matches!(result, Err(ElxError::FilesystemError(_))));
    }

    #[tokio::test]
    async fn removes_trees_and_tolerates_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("electron-28.0.0-linux-x64");
        std::fs::create_dir_all(tree.join("resources")).unwrap();
        std::fs::write(tree.join("resources/app.asar"), b"x").unwrap();

        remove_path_async(&tree).await.unwrap();
        assert!(!tree.exists());
        remove_path_async(&tree).await.unwrap();
    }

    #[tokio::test]
    async fn best_effort_removal_reports_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("electron.zip");
        std::fs::write(&file, b"zip").unwrap();

        assert!(remove_file_best_effort(&file).await);
        assert!(!remove_file_best_effort(&file).await);
        assert!(!is_regular_file(&file).await);
    }
}
