//! The tile fetch pipeline.
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileFetcher::fetch                      │
//! │  1. Validate config + job    5. Wrap body (gzip / identity)     │
//! │  2. Resolve tile URL         6. Decode bitmap                   │
//! │  3. Open connection          7. Attach expiration               │
//! │  4. Require status 200                                          │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                    │                     │
//!            ▼                    ▼                     ▼
//!     ┌────────────┐      ┌──────────────┐     ┌────────────────┐
//!     │ TileSource │      │  Transport   │     │ BitmapDecoder  │
//!     └────────────┘      └──────────────┘     └────────────────┘
//! ```
//!
//! Every failure ends up in one of the three [`FetchResult`] variants. Only
//! a truncated or corrupted stream becomes a
//! [`RetryableMiss`](FetchResult::RetryableMiss); everything else is a
//! definitive [`Failure`](FetchResult::Failure).

use std::time::Instant;

use tracing::{debug, warn};

use super::config::{FetchConfig, SharedFetchConfig};
use super::result::FetchResult;
use crate::decode::{BitmapDecoder, ContentEncoding, ImageBitmapDecoder};
use crate::error::{DecodeError, FetchError};
use crate::tile::DownloadJob;
use crate::transport::{SchemeTransport, Transport};

/// HTTP status accepted as a tile.
const HTTP_OK: u16 = 200;

/// Performs single fetch-and-decode attempts.
///
/// The fetcher holds no per-request state, so one instance can serve any
/// number of concurrent fetches.
///
/// # Type Parameters
///
/// * `T` - Transport used to open tile URLs
/// * `D` - Decoder turning response bodies into bitmaps
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tile_downloader::{DownloadJob, FetchConfig, FetchResult, Tile, TileFetcher, UrlTemplateSource};
///
/// #[tokio::main]
/// async fn main() {
///     let source = UrlTemplateSource::new("https://tile.example.org/{z}/{x}/{y}.png").unwrap();
///     let job = DownloadJob::new(Tile::new(0, 0, 0, 256).unwrap(), Arc::new(source));
///
///     let fetcher = TileFetcher::default();
///     match fetcher.fetch(&job, &FetchConfig::default()).await {
///         FetchResult::Success { bitmap, expiration } => {
///             println!("{}x{} tile, expires {:?}", bitmap.width(), bitmap.height(), expiration);
///         }
///         FetchResult::RetryableMiss => println!("try again later"),
///         FetchResult::Failure(e) => eprintln!("{}", e),
///     }
/// }
/// ```
pub struct TileFetcher<T = SchemeTransport, D = ImageBitmapDecoder> {
    transport: T,
    decoder: D,
}

impl Default for TileFetcher {
    fn default() -> Self {
        Self::new(SchemeTransport::default(), ImageBitmapDecoder::new())
    }
}

impl<T: Transport, D: BitmapDecoder> TileFetcher<T, D> {
    pub fn new(transport: T, decoder: D) -> Self {
        Self { transport, decoder }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Fetch and decode the job's tile once, using `config` for the
    /// connection.
    ///
    /// Configuration and job errors are reported before any network
    /// activity. The response and its body are released before this returns,
    /// whatever the outcome.
    pub async fn fetch(&self, job: &DownloadJob, config: &FetchConfig) -> FetchResult {
        let started = Instant::now();

        match self.download(job, config).await {
            Ok(result) => {
                match result {
                    FetchResult::Success { .. } => debug!(
                        tile = %job.tile(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Tile fetched"
                    ),
                    _ => debug!(
                        tile = %job.tile(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Tile stream truncated, retryable"
                    ),
                }
                result
            }
            Err(e) => {
                warn!(
                    tile = %job.tile(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Tile fetch failed"
                );
                FetchResult::Failure(e)
            }
        }
    }

    /// Fetch using a snapshot of process-wide settings.
    ///
    /// The snapshot is taken once, before connecting; later updates to
    /// `shared` do not affect this fetch.
    pub async fn fetch_shared(&self, job: &DownloadJob, shared: &SharedFetchConfig) -> FetchResult {
        let config = shared.snapshot();
        self.fetch(job, &config).await
    }

    /// Pipeline body. `Ok` carries a success or a retryable miss.
    async fn download(
        &self,
        job: &DownloadJob,
        config: &FetchConfig,
    ) -> Result<FetchResult, FetchError> {
        config.validate()?;
        job.validate()?;
        let url = job.url()?;

        debug!(tile = %job.tile(), url = %url, "Fetching tile");

        let response = self.transport.open(&url, config).await?;

        if let Some(code) = response.status() {
            if code != HTTP_OK {
                return Err(FetchError::Status {
                    code,
                    url: url.to_string(),
                });
            }
        }

        let encoding = ContentEncoding::from_header(response.content_encoding());
        let expiration = response.expiration();

        let body = match response.into_body().await {
            Ok(body) => body,
            Err(FetchError::Truncated { message, .. }) => {
                debug!(url = %url, reason = %message, "Response body cut short");
                return Ok(FetchResult::RetryableMiss);
            }
            Err(e) => return Err(e),
        };

        let mut stream = encoding.wrap(body);
        let tile = job.tile();

        match self
            .decoder
            .decode(&mut stream, tile.tile_size(), job.has_alpha())
        {
            Ok(bitmap) => Ok(FetchResult::Success { bitmap, expiration }),
            Err(DecodeError::Corrupted(reason)) => {
                // Slow or interrupted connections truncate otherwise valid
                // tiles; the caller can re-enqueue the same job.
                debug!(url = %url, reason = %reason, "Corrupted tile stream");
                Ok(FetchResult::RetryableMiss)
            }
            Err(DecodeError::Io(message)) => Err(FetchError::Io {
                url: url.to_string(),
                message,
            }),
            Err(e @ DecodeError::Format(_)) => Err(FetchError::Decode {
                url: url.to_string(),
                source: e,
            }),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
