// elx-net/src/progress.rs
use std::fmt;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Download progress in megabytes, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    pub loaded_mb: f64,
    pub total_mb: f64,
}

impl DownloadProgress {
    /// Derives loaded/total from a completion percentage and the bytes still
    /// outstanding: `total = remaining / ((100 - percent) / 100)`.
    ///
    /// Returns `None` once `percent` reaches 100, where the ratio is undefined.
    pub fn from_percent(percent: f64, remaining_bytes: u64) -> Option<Self> {
        if !(0.0..100.0).contains(&percent) {
            return None;
        }
        let remaining_mb = remaining_bytes as f64 / BYTES_PER_MB;
        let total = remaining_mb / ((100.0 - percent) / 100.0);
        let loaded = total - remaining_mb;
        Some(Self {
            loaded_mb: round2(loaded),
            total_mb: round2(total),
        })
    }

    /// Progress after `downloaded` of `total` bytes, using the exact
    /// fractional percentage.
    pub fn from_bytes(downloaded: u64, total: u64) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let downloaded = downloaded.min(total);
        let percent = downloaded as f64 * 100.0 / total as f64;
        Self::from_percent(percent, total - downloaded)
    }

    /// Final snapshot for a transfer of `bytes` that has completed.
    pub fn complete(bytes: u64) -> Self {
        let mb = round2(bytes as f64 / BYTES_PER_MB);
        Self {
            loaded_mb: mb,
            total_mb: mb,
        }
    }
}

impl fmt::Display for DownloadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}/{:.2}MB", self.loaded_mb, self.total_mb)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
