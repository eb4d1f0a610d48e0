// elx-common/src/lib.rs
pub mod config;
pub mod env;
pub mod error;
pub mod model;
pub mod platform;

// Re-export key types
pub use config::Config;
pub use env::sanitize_env;
pub use error::{ElxError, Result};
pub use model::{DownloadDescriptor, ResolvedExecutable};
