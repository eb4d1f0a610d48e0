// elx-core/src/install/reporter.rs
//! Seam to the host UI that shows install progress and failures.

/// Implemented by whatever presents an install to the user.
pub trait InstallReporter: Send + Sync {
    /// Periodic download progress in megabytes.
    fn progress(&self, loaded_mb: f64, total_mb: f64);

    /// Free-form status line, e.g. "Extracting...".
    fn message(&self, _message: &str) {}

    /// User-facing failure notification.
    fn error(&self, _message: &str) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl InstallReporter for SilentReporter {
    fn progress(&self, _loaded_mb: f64, _total_mb: f64) {}
}
