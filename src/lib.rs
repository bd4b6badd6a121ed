//! # Tile Downloader
//!
//! Fetches a single map tile over the network and decodes it into a bitmap.
//!
//! Given a [`DownloadJob`] (tile coordinate, tile source, alpha flag) and a
//! [`FetchConfig`] (timeouts, headers, redirect policy), a [`TileFetcher`]
//! resolves the tile URL, downloads the body, transparently decompresses
//! gzip, decodes the image and attaches the expiration announced by the
//! server's cache headers.
//!
//! ## Outcomes
//!
//! Every fetch ends in one of three [`FetchResult`]s:
//!
//! - **Success**: a decoded [`TileBitmap`] plus an optional expiration
//! - **Failure**: a definitive [`FetchError`] (bad status, timeout, bad data...)
//! - **RetryableMiss**: the stream was truncated or corrupted in transit; the
//!   same job is worth submitting again
//!
//! ## Architecture
//!
//! - [`tile`] - Tile coordinates, URL template sources and download jobs
//! - [`transport`] - HTTP(S) and `file://` transports, cache header parsing
//! - [`decode`] - Content-encoding handling and image decoding
//! - [`fetch`] - Fetch settings and the fetch pipeline
//! - [`config`] - CLI configuration for the binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tile_downloader::{DownloadJob, FetchConfig, Tile, TileFetcher, UrlTemplateSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = UrlTemplateSource::new("https://{s}.tile.example.org/{z}/{x}/{y}.png")
//!         .unwrap()
//!         .with_subdomains(["a", "b", "c"])
//!         .unwrap();
//!     let job = DownloadJob::new(Tile::new(136, 87, 8, 256).unwrap(), Arc::new(source));
//!
//!     let config = FetchConfig::default().with_user_agent("my-map/1.0");
//!     let result = TileFetcher::default().fetch(&job, &config).await;
//!     println!("{}: {}", job.tile(), result.outcome());
//! }
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod tile;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use decode::{BitmapDecoder, ContentEncoding, ImageBitmapDecoder, TileBitmap};
pub use error::{DecodeError, FetchError, TileError};
pub use fetch::{
    FetchConfig, FetchReport, FetchResult, SharedFetchConfig, TileFetcher,
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, MAX_REDIRECTS,
};
pub use tile::{DownloadJob, Tile, TileSource, UrlTemplateSource, DEFAULT_TILE_SIZE, MAX_ZOOM};
pub use transport::{
    FileTransport, HttpTransport, SchemeTransport, Transport, TransportResponse,
};
