// elx-net/src/lib.rs
pub mod http;
pub mod progress;
pub mod validation;
pub mod version;

pub use elx_common::{
    error::{ElxError, Result},
    Config, DownloadDescriptor,
};
pub use http::{build_http_client, download_archive};
pub use progress::DownloadProgress;
pub use validation::validate_url;
pub use version::VersionResolver;
