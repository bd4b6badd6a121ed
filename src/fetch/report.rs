use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::result::FetchResult;
use crate::tile::DownloadJob;

/// Serializable summary of one fetch, printed by the binary in `--json` mode.
#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    /// Tile in `z/x/y@Npx` form
    pub tile: String,

    /// Resolved URL, absent when the source could not build one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// `success`, `failure` or `retryable_miss`
    pub outcome: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_alpha: Option<bool>,

    /// Expiration in seconds since the Unix epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// HTTP status code for protocol failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl FetchReport {
    pub fn new(job: &DownloadJob, result: &FetchResult) -> Self {
        let bitmap = result.bitmap();
        Self {
            tile: job.tile().to_string(),
            url: job.url().ok().map(|u| u.to_string()),
            outcome: result.outcome(),
            width: bitmap.map(|b| b.width()),
            height: bitmap.map(|b| b.height()),
            has_alpha: bitmap.map(|b| b.has_alpha()),
            expires: result.expiration().map(unix_seconds),
            error: result.error().map(|e| e.to_string()),
            status: result.error().and_then(|e| e.status_code()),
        }
    }
}

/// Seconds since the epoch; times before it clamp to 0.
fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
