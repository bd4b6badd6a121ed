//! Fetching tiles: settings, the fetch pipeline and its outcome.
//!
//! A fetch is a single attempt. It never retries on its own; a
//! [`FetchResult::RetryableMiss`] tells the caller the same job is worth
//! submitting again.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tile_downloader::fetch::{FetchConfig, SharedFetchConfig, TileFetcher};
//! use tile_downloader::{DownloadJob, Tile, UrlTemplateSource};
//!
//! # async fn run() {
//! let shared = SharedFetchConfig::new(
//!     FetchConfig::default()
//!         .with_user_agent("my-map/1.0")
//!         .with_read_timeout(Duration::from_secs(5)),
//! );
//!
//! let source = Arc::new(UrlTemplateSource::new("https://tile.example.org/{z}/{x}/{y}.png").unwrap());
//! let job = DownloadJob::new(Tile::new(8, 5, 4, 256).unwrap(), source);
//!
//! let result = TileFetcher::default().fetch_shared(&job, &shared).await;
//! println!("{}", result.outcome());
//! # }
//! ```

mod config;
mod fetcher;
mod report;
mod result;

pub use config::{
    FetchConfig, SharedFetchConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, MAX_REDIRECTS,
};
pub use fetcher::TileFetcher;
pub use report::FetchReport;
pub use result::FetchResult;
