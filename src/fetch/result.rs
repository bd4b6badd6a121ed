use std::time::SystemTime;

use crate::decode::TileBitmap;
use crate::error::FetchError;

/// Outcome of one fetch attempt.
///
/// The calling layer owns retry policy: a [`RetryableMiss`](Self::RetryableMiss)
/// means the same job is expected to succeed if submitted again, while a
/// [`Failure`](Self::Failure) will not get better by retrying right away.
#[derive(Debug)]
pub enum FetchResult {
    /// Tile decoded; `expiration` is `None` when the server sent no usable
    /// cache headers
    Success {
        bitmap: TileBitmap,
        expiration: Option<SystemTime>,
    },

    /// Definitive failure with its diagnostic
    Failure(FetchError),

    /// The stream was truncated or corrupted in transit
    RetryableMiss,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchResult::Failure(_))
    }

    pub fn is_retryable_miss(&self) -> bool {
        matches!(self, FetchResult::RetryableMiss)
    }

    pub fn bitmap(&self) -> Option<&TileBitmap> {
        match self {
            FetchResult::Success { bitmap, .. } => Some(bitmap),
            _ => None,
        }
    }

    pub fn into_bitmap(self) -> Option<TileBitmap> {
        match self {
            FetchResult::Success { bitmap, .. } => Some(bitmap),
            _ => None,
        }
    }

    pub fn expiration(&self) -> Option<SystemTime> {
        match self {
            FetchResult::Success { expiration, .. } => *expiration,
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchResult::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// Short label for logs and reports.
    pub fn outcome(&self) -> &'static str {
        match self {
            FetchResult::Success { .. } => "success",
            FetchResult::Failure(_) => "failure",
            FetchResult::RetryableMiss => "retryable_miss",
        }
    }
}

impl From<FetchError> for FetchResult {
    fn from(err: FetchError) -> Self {
        FetchResult::Failure(err)
    }
}
