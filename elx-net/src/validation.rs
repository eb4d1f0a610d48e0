// elx-net/src/validation.rs
use elx_common::error::{ElxError, Result};
use url::Url;

/// Validates a URL. With `require_https` only the https scheme is accepted,
/// otherwise plain http is tolerated as well.
pub fn validate_url(url_str: &str, require_https: bool) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| ElxError::ValidationError(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" => Ok(()),
        "http" if !require_https => Ok(()),
        scheme => Err(ElxError::ValidationError(format!(
            "Invalid URL scheme for '{url_str}': Must be https, but got '{scheme}'"
        ))),
    }
}
