// elx-core/src/install/lock.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tokio::sync::Mutex as AsyncMutex;

// One entry per distinct directory, kept for the life of the process.
static INSTALL_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Process-wide exclusive lock for one installation directory.
///
/// Keyed by absolute path so it does not change once the directory exists.
/// Entries are never evicted.
pub fn install_lock(install_dir: &Path) -> Arc<AsyncMutex<()>> {
    let key = std::path::absolute(install_dir).unwrap_or_else(|_| install_dir.to_path_buf());
    let mut locks = INSTALL_LOCKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_directory_shares_a_lock() {
        let a = install_lock(Path::new("/tmp/elx-lock-test/a"));
        let again = install_lock(Path::new("/tmp/elx-lock-test/a"));
        let b = install_lock(Path::new("/tmp/elx-lock-test/b"));
        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn relative_and_absolute_forms_share_one_entry() {
        let relative = Path::new("elx-lock-test-relative");
        let absolute = std::env::current_dir().unwrap().join(relative);
        let first = install_lock(relative);
        assert!(Arc::ptr_eq(&first, &install_lock(&absolute)));
        assert!(Arc::ptr_eq(&first, &install_lock(relative)));
    }

    #[tokio::test]
    async fn second_holder_waits() {
        let lock = install_lock(Path::new("/tmp/elx-lock-test/wait"));
        let guard = lock.lock().await;
        assert!(install_lock(Path::new("/tmp/elx-lock-test/wait"))
            .try_lock()
            .is_err());
        drop(guard);
        assert!(lock.try_lock().is_ok());
    }
}
