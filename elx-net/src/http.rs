use std::path::{Path, PathBuf};
use std::time::Duration;

use elx_common::error::{ElxError, Result};
use elx_common::model::DownloadDescriptor;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use tokio::fs::{self, File as TokioFile};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::progress::DownloadProgress;
use crate::validation::validate_url;

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const RETRY_BACKOFF_MILLIS: u64 = 500;
const USER_AGENT_STRING: &str = "elx electron manager (Rust; +https://github.com/alexykn/elx)";

pub fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| ElxError::NetworkError(format!("Failed to build HTTP client: {e}")))
}

/// Downloads `descriptor` into `directory`, retrying up to `attempts` times.
///
/// An archive already present under the final name is reused as is. Progress
/// is reported whenever the completed percentage advances; transfers without
/// a known length only report once finished. Cancellation is never retried.
pub async fn download_archive<F>(
    client: &Client,
    descriptor: &DownloadDescriptor,
    directory: &Path,
    attempts: u32,
    require_https: bool,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<PathBuf>
where
    F: FnMut(DownloadProgress) + Send,
{
    validate_url(&descriptor.url, require_https)?;
    let final_path = directory.join(&descriptor.file_name);

    if final_path.is_file() {
        debug!(
            "Archive already present, skipping download: {}",
            final_path.display()
        );
        return Ok(final_path);
    }

    fs::create_dir_all(directory).await.map_err(|e| {
        ElxError::FilesystemError(format!(
            "Failed to create install directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let attempts = attempts.max(1);
    let mut last_error: Option<ElxError> = None;

    for attempt in 1..=attempts {
        if cancel.is_cancelled() {
            return Err(cancelled(&descriptor.file_name));
        }
        debug!(
            "Download attempt {}/{} for {} from {}",
            attempt, attempts, descriptor.file_name, descriptor.url
        );
        match download_once(client, &descriptor.url, &final_path, cancel, &mut on_progress).await
        {
            Ok(path) => return Ok(path),
            Err(e) if e.is_cancelled() => {
                debug!("Download of {} cancelled", descriptor.file_name);
                return Err(e);
            }
            Err(e) => {
                warn!(
                    "Download attempt {}/{} failed for {}: {}",
                    attempt, attempts, descriptor.url, e
                );
                last_error = Some(e);
                if attempt < attempts {
                    let backoff = Duration::from_millis(RETRY_BACKOFF_MILLIS * attempt as u64);
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(cancelled(&descriptor.file_name)),
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }
    }

    let reason = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "All download attempts failed.".to_string());
    error!("Giving up on {} after {} attempts", descriptor.url, attempts);
    Err(ElxError::DownloadError(
        descriptor.file_name.clone(),
        descriptor.url.clone(),
        reason,
    ))
}

fn cancelled(file_name: &str) -> ElxError {
    ElxError::Cancelled(format!("download of {file_name}"))
}

async fn download_once<F>(
    client: &Client,
    url: &str,
    final_path: &Path,
    cancel: &CancellationToken,
    on_progress: &mut F,
) -> Result<PathBuf>
where
    F: FnMut(DownloadProgress) + Send,
{
    let file_name = final_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp_path = final_path.with_file_name(format!(".{file_name}.download"));
    if temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path).await {
            warn!(
                "Could not remove existing temporary file {}: {}",
                temp_path.display(),
                e
            );
        }
    }

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(cancelled(&file_name)),
        sent = client.get(url).send() => sent.map_err(|e| {
            debug!("HTTP request failed for {url}: {e}");
            ElxError::NetworkError(format!("HTTP request failed for {url}: {e}"))
        })?,
    };

    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);
    if !status.is_success() {
        return Err(match status {
            StatusCode::NOT_FOUND => ElxError::DownloadError(
                file_name,
                url.to_string(),
                "Resource not found (404)".to_string(),
            ),
            StatusCode::FORBIDDEN => ElxError::DownloadError(
                file_name,
                url.to_string(),
                "Access forbidden (403)".to_string(),
            ),
            _ => ElxError::NetworkError(format!("HTTP error {status} for URL {url}")),
        });
    }

    let total_bytes = response.content_length().filter(|len| *len > 0);
    let mut temp_file = TokioFile::create(&temp_path).await.map_err(|e| {
        ElxError::FilesystemError(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let mut last_percent: Option<u64> = None;

    let transfer: Result<()> = async {
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&file_name)),
                next = stream.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk.map_err(|e| {
                ElxError::NetworkError(format!("Download interrupted: {e}"))
            })?;
            temp_file.write_all(&chunk).await.map_err(|e| {
                ElxError::FilesystemError(format!(
                    "Failed to write download stream to {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            downloaded += chunk.len() as u64;

            if let Some(total) = total_bytes {
                // Whole percents only throttle reporting.
                let percent = (downloaded.min(total) * 100) / total;
                if last_percent != Some(percent) {
                    last_percent = Some(percent);
                    if let Some(progress) = DownloadProgress::from_bytes(downloaded, total) {
                        on_progress(progress);
                    }
                }
            }
        }
        temp_file.flush().await?;
        Ok(())
    }
    .await;
    drop(temp_file);

    if let Err(e) = transfer {
        if let Err(remove_err) = fs::remove_file(&temp_path).await {
            debug!(
                "Failed to remove partial download {}: {}",
                temp_path.display(),
                remove_err
            );
        }
        return Err(e);
    }
    on_progress(DownloadProgress::complete(downloaded));
    debug!("Finished writing {} bytes to temp file.", downloaded);

    fs::rename(&temp_path, final_path).await.map_err(|e| {
        ElxError::FilesystemError(format!(
            "Failed to move temp file {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e
        ))
    })?;
    debug!("Moved download to final location: {}", final_path.display());
    Ok(final_path.to_path_buf())
}
