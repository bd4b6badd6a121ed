//! Tiles and where to find them.
//!
//! # Components
//!
//! - [`Tile`]: validated tile coordinate plus pixel size
//! - [`TileSource`]: maps a tile to its URL
//! - [`UrlTemplateSource`]: `{z}/{x}/{y}` style template source with
//!   subdomain rotation, TMS rows and quadkeys
//! - [`DownloadJob`]: one tile request (tile, source, alpha flag)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tile_downloader::tile::{DownloadJob, Tile, UrlTemplateSource};
//!
//! let source = UrlTemplateSource::new("https://tiles.example.org/{z}/{x}/{y}.png").unwrap();
//! let job = DownloadJob::new(Tile::new(4, 2, 3, 256).unwrap(), Arc::new(source));
//!
//! assert_eq!(job.url().unwrap().path(), "/3/4/2.png");
//! ```

mod coord;
mod job;
mod source;

pub use coord::{Tile, DEFAULT_TILE_SIZE, MAX_ZOOM};
pub use job::DownloadJob;
pub use source::{TileSource, UrlTemplateSource};
