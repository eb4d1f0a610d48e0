// elx-core/src/lib.rs

pub mod install;
pub mod locate;
pub mod manager;
pub mod process;

pub use install::{EnsureOutcome, InstallReporter, Installer, SilentReporter};
pub use locate::{normalize_version_output, ExecutableLocator};
pub use manager::{Manager, CONNECTIVITY_ERROR_MESSAGE};
pub use process::{ProcessController, ProcessHandle};
