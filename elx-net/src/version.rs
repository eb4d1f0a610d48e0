// elx-net/src/version.rs
//! Latest-release lookup: npm registry first, GitHub releases as fallback.

use std::time::Duration;

use elx_common::config::Config;
use elx_common::error::{ElxError, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http::build_http_client;
use crate::validation::validate_url;

#[derive(Debug, Clone)]
pub struct VersionResolver {
    client: Client,
    primary_url: String,
    fallback_url: String,
    primary_timeout: Duration,
    fallback_timeout: Duration,
    require_https: bool,
}

impl VersionResolver {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(config, build_http_client()?))
    }

    pub fn with_client(config: &Config, client: Client) -> Self {
        Self {
            client,
            primary_url: config.registry_url.clone(),
            fallback_url: config.releases_api_url.clone(),
            primary_timeout: config.primary_timeout,
            fallback_timeout: config.fallback_timeout,
            require_https: config.require_https,
        }
    }

    /// Resolves the latest published version.
    ///
    /// Only a transport-level failure of the primary endpoint moves on to the
    /// fallback. The fallback's `tag_name` is returned verbatim, so the two
    /// sources disagree on the `v` prefix (`28.0.0` vs `v28.0.1`).
    pub async fn latest(&self) -> Result<String> {
        debug!("Fetching metadata from npm registry");
        match self.fetch_json(&self.primary_url, self.primary_timeout).await {
            Ok(body) => string_field(&body, "version", &self.primary_url),
            Err(e) if e.is_network() => {
                warn!("Npm registry failed ({}), trying github release api", e);
                let body = self
                    .fetch_json(&self.fallback_url, self.fallback_timeout)
                    .await?;
                string_field(&body, "tag_name", &self.fallback_url)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_json(&self, url: &str, timeout: Duration) -> Result<Value> {
        validate_url(url, self.require_https)?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ElxError::NetworkError(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ElxError::NetworkError(format!(
                "HTTP error {status} from {url}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ElxError::NetworkError(format!("Failed to read body from {url}: {e}")))?;
        debug!("Metadata response ({} bytes) from {}", bytes.len(), url);

        serde_json::from_slice(&bytes).map_err(|e| {
            ElxError::ResolutionError(format!("Malformed metadata from {url}: {e}"))
        })
    }
}

fn string_field(body: &Value, field: &str, url: &str) -> Result<String> {
    match body.get(field).and_then(Value::as_str) {
        Some(value) => {
            debug!("Resolved '{}' = {} from {}", field, value, url);
            Ok(value.to_string())
        }
        None => Err(ElxError::ResolutionError(format!(
            "Cannot get version details: '{field}' missing from {url}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn string_field_requires_a_string() {
        let body = json!({ "version": "28.0.0" });
        assert_eq!(string_field(&body, "version", "u").unwrap(), "28.0.0");

        let numeric = json!({ "version": 28 });
        assert!(matches!(
            string_field(&numeric, "version", "u"),
            Err(ElxError::ResolutionError(_))
        ));

        let missing = json!({});
        assert!(matches!(
            string_field(&missing, "tag_name", "u"),
            Err(ElxError::ResolutionError(_))
        ));
    }
}
