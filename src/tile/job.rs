use std::fmt;
use std::sync::Arc;

use url::Url;

use super::coord::Tile;
use super::source::TileSource;
use crate::error::{FetchError, TileError};

/// Description of one tile to download.
///
/// A job is built by the caller per tile request and handed to a single fetch
/// attempt. It is cheap to clone, so the caller can keep it around and
/// resubmit it after a retryable miss.
#[derive(Clone)]
pub struct DownloadJob {
    tile: Tile,
    source: Arc<dyn TileSource>,
    has_alpha: bool,
}

impl DownloadJob {
    /// Create an opaque-tile job.
    pub fn new(tile: Tile, source: Arc<dyn TileSource>) -> Self {
        Self {
            tile,
            source,
            has_alpha: false,
        }
    }

    /// Request an alpha channel in the decoded bitmap.
    pub fn with_alpha(mut self, has_alpha: bool) -> Self {
        self.has_alpha = has_alpha;
        self
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn source(&self) -> &Arc<dyn TileSource> {
        &self.source
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Check the job can be served by its source.
    ///
    /// Runs before any network activity.
    pub fn validate(&self) -> Result<(), FetchError> {
        let zoom = self.tile.zoom();
        let (min, max) = (self.source.min_zoom(), self.source.max_zoom());
        if min > max {
            return Err(FetchError::InvalidJob(format!(
                "tile source {} has an empty zoom range {}..={}",
                self.source.identifier(),
                min,
                max
            )));
        }
        if zoom < min || zoom > max {
            return Err(TileError::ZoomOutOfRange {
                zoom,
                min,
                max,
                source_id: self.source.identifier().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Resolve the tile URL through the source.
    pub fn url(&self) -> Result<Url, TileError> {
        self.source.tile_url(&self.tile)
    }
}

impl fmt::Debug for DownloadJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadJob")
            .field("tile", &self.tile)
            .field("source", &self.source.identifier())
            .field("has_alpha", &self.has_alpha)
            .finish()
    }
}
