use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ElxError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Semantic Versioning Error: {0}")]
    SemVer(#[from] Arc<semver::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    /// The remote endpoint could not be reached (connect, DNS, timeout, bad status).
    #[error("Network Error: {0}")]
    NetworkError(String),

    /// The endpoint answered but the answer did not carry the expected data.
    #[error("Resolution Error: {0}")]
    ResolutionError(String),

    #[error("Probe Failure: {0}")]
    ProbeFailure(String),

    #[error("Filesystem Error: {0}")]
    FilesystemError(String),

    #[error("Electron builds are not available on platform: {0}")]
    UnsupportedPlatform(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Extraction Error: {0}")]
    ExtractError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Failed to execute command: {0}")]
    CommandExecError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl ElxError {
    /// Transport-level failures; the only class that triggers the fallback
    /// metadata endpoint.
    pub fn is_network(&self) -> bool {
        matches!(self, ElxError::NetworkError(_) | ElxError::Http(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ElxError::Cancelled(_))
    }
}

impl From<std::io::Error> for ElxError {
    fn from(err: std::io::Error) -> Self {
        ElxError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for ElxError {
    fn from(err: reqwest::Error) -> Self {
        ElxError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for ElxError {
    fn from(err: serde_json::Error) -> Self {
        ElxError::Json(Arc::new(err))
    }
}

impl From<semver::Error> for ElxError {
    fn from(err: semver::Error) -> Self {
        ElxError::SemVer(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ElxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_classification() {
        assert!(ElxError::NetworkError("refused".into()).is_network());
        assert!(!ElxError::ResolutionError("no version".into()).is_network());
        assert!(!ElxError::Cancelled("user".into()).is_network());
    }

    #[test]
    fn unsupported_platform_message() {
        let err = ElxError::UnsupportedPlatform("aix".into());
        assert_eq!(
            err.to_string(),
            "Electron builds are not available on platform: aix"
        );
    }
}
