//! Tile sources: mapping a tile to the URL it is served from.

use url::Url;

use super::coord::{Tile, MAX_ZOOM};
use crate::error::TileError;

/// Something that knows where a tile lives.
///
/// Implementations must be thread-safe: one source is typically shared by
/// every download job of a layer.
pub trait TileSource: Send + Sync {
    /// Resolve the URL for `tile`.
    ///
    /// Fails if the tile is outside what this source serves or the resulting
    /// URL is invalid.
    fn tile_url(&self, tile: &Tile) -> Result<Url, TileError>;

    /// Identifier used in logs and error messages.
    fn identifier(&self) -> &str;

    /// Lowest zoom level served.
    fn min_zoom(&self) -> u8 {
        0
    }

    /// Highest zoom level served.
    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }
}

// =============================================================================
// URL Template Source
// =============================================================================

/// Tile source driven by a URL template.
///
/// Supported placeholders:
///
/// - `{z}`, `{x}`, `{y}`: zoom and tile coordinates
/// - `{-y}`: row flipped for TMS servers
/// - `{q}`: Bing Maps quadkey
/// - `{s}`: one of the configured subdomains, picked from `(x + y) % n` so a
///   tile always maps to the same host
///
/// # Example
///
/// ```
/// use tile_downloader::tile::{Tile, TileSource, UrlTemplateSource};
///
/// let source = UrlTemplateSource::new("https://{s}.tile.example.org/{z}/{x}/{y}.png")
///     .unwrap()
///     .with_subdomains(["a", "b", "c"])
///     .unwrap();
///
/// let tile = Tile::new(1, 2, 3, 256).unwrap();
/// let url = source.tile_url(&tile).unwrap();
/// assert_eq!(url.as_str(), "https://a.tile.example.org/3/1/2.png");
/// ```
#[derive(Debug, Clone)]
pub struct UrlTemplateSource {
    template: String,
    subdomains: Vec<String>,
    min_zoom: u8,
    max_zoom: u8,
}

impl UrlTemplateSource {
    /// Create a source from a template.
    ///
    /// Templates containing `{s}` need subdomains, see
    /// [`with_subdomains`](Self::with_subdomains); [`tile_url`](TileSource::tile_url)
    /// rejects them until some are configured.
    pub fn new(template: impl Into<String>) -> Result<Self, TileError> {
        let template = template.into();
        if template.trim().is_empty() {
            return Err(TileError::InvalidTemplate("template is empty".to_string()));
        }

        Ok(Self {
            template,
            subdomains: Vec::new(),
            min_zoom: 0,
            max_zoom: MAX_ZOOM,
        })
    }

    /// Set the hosts substituted for `{s}`.
    pub fn with_subdomains<I, S>(mut self, subdomains: I) -> Result<Self, TileError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subdomains: Vec<String> = subdomains.into_iter().map(Into::into).collect();
        if subdomains.iter().any(|s| s.is_empty()) {
            return Err(TileError::InvalidTemplate(
                "subdomains must not be empty strings".to_string(),
            ));
        }
        self.subdomains = subdomains;
        Ok(self)
    }

    /// Restrict the zoom levels this source serves.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Result<Self, TileError> {
        if min_zoom > max_zoom || max_zoom > MAX_ZOOM {
            return Err(TileError::InvalidTemplate(format!(
                "invalid zoom range {}..={}",
                min_zoom, max_zoom
            )));
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        Ok(self)
    }

    /// The raw template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    fn subdomain_for(&self, tile: &Tile) -> Result<&str, TileError> {
        if self.subdomains.is_empty() {
            return Err(TileError::InvalidTemplate(format!(
                "'{}' uses {{s}} but no subdomains are configured",
                self.template
            )));
        }
        let index = (u64::from(tile.x()) + u64::from(tile.y())) % self.subdomains.len() as u64;
        Ok(&self.subdomains[index as usize])
    }

    fn expand(&self, tile: &Tile) -> Result<String, TileError> {
        let mut url = self
            .template
            .replace("{z}", &tile.zoom().to_string())
            .replace("{x}", &tile.x().to_string())
            .replace("{-y}", &tile.tms_y().to_string())
            .replace("{y}", &tile.y().to_string());

        if url.contains("{q}") {
            url = url.replace("{q}", &tile.quadkey());
        }
        if url.contains("{s}") {
            url = url.replace("{s}", self.subdomain_for(tile)?);
        }

        Ok(url)
    }
}

impl TileSource for UrlTemplateSource {
    fn tile_url(&self, tile: &Tile) -> Result<Url, TileError> {
        if tile.zoom() < self.min_zoom || tile.zoom() > self.max_zoom {
            return Err(TileError::ZoomOutOfRange {
                zoom: tile.zoom(),
                min: self.min_zoom,
                max: self.max_zoom,
                source_id: self.template.clone(),
            });
        }

        let expanded = self.expand(tile)?;
        Url::parse(&expanded).map_err(|e| TileError::InvalidUrl {
            url: expanded.clone(),
            message: e.to_string(),
        })
    }

    fn identifier(&self) -> &str {
        &self.template
    }

    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}
