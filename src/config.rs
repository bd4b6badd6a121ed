//! Command-line configuration for the `tile-downloader` binary.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TILE_` prefix
//! - The library defaults for every optional setting
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use tile_downloader::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//!
//! let job = config.download_job()?;
//! let fetch_config = config.fetch_config();
//! ```
//!
//! # Environment Variables
//!
//! - `TILE_URL` - URL template (required)
//! - `TILE_SUBDOMAINS` - Comma-separated hosts for `{s}`
//! - `TILE_SIZE` - Tile size in pixels (default: 256)
//! - `TILE_CONNECT_TIMEOUT_MS` - Connect timeout (default: 5000)
//! - `TILE_READ_TIMEOUT_MS` - Read timeout (default: 10000)
//! - `TILE_USER_AGENT` - `User-Agent` header (default: none)
//! - `TILE_REFERER` - `Referer` header (default: none)
//! - `TILE_FOLLOW_REDIRECTS` - Follow 3xx responses (default: false)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::fetch::{FetchConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
use crate::tile::{DownloadJob, Tile, UrlTemplateSource, DEFAULT_TILE_SIZE, MAX_ZOOM};

// =============================================================================
// Default Values
// =============================================================================

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = DEFAULT_CONNECT_TIMEOUT.as_millis() as u64;

/// Default read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = DEFAULT_READ_TIMEOUT.as_millis() as u64;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Tile Downloader - fetch and decode a single map tile.
///
/// Resolves the tile URL from a template, downloads it with the configured
/// timeouts and headers, decodes it into a bitmap and reports the outcome.
/// Exit code 0 on success, 2 when the download was cut short and is worth
/// retrying, 1 on any other failure.
#[derive(Parser, Debug, Clone)]
#[command(name = "tile-downloader")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Tile Selection
    // =========================================================================
    /// URL template, e.g. `https://{s}.tile.example.org/{z}/{x}/{y}.png`.
    ///
    /// Supports `{z}`, `{x}`, `{y}`, `{-y}` (TMS row), `{q}` (quadkey) and
    /// `{s}` (subdomain).
    #[arg(long, env = "TILE_URL")]
    pub url: String,

    /// Zoom level.
    #[arg(short, long)]
    pub zoom: u8,

    /// Tile column.
    #[arg(short, long)]
    pub x: u32,

    /// Tile row (XYZ scheme, 0 at the top).
    #[arg(short, long)]
    pub y: u32,

    /// Tile size in pixels; decoded images are scaled to this size.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "TILE_SIZE")]
    pub tile_size: u32,

    /// Decode with an alpha channel.
    #[arg(long, default_value_t = false)]
    pub alpha: bool,

    /// Hosts substituted for `{s}` (comma-separated).
    #[arg(long, env = "TILE_SUBDOMAINS", value_delimiter = ',')]
    pub subdomains: Option<Vec<String>>,

    // =========================================================================
    // Connection Configuration
    // =========================================================================
    /// Connect timeout in milliseconds.
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_MS, env = "TILE_CONNECT_TIMEOUT_MS")]
    pub connect_timeout_ms: u64,

    /// Read timeout in milliseconds.
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_MS, env = "TILE_READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// `User-Agent` header sent with the request.
    #[arg(long, env = "TILE_USER_AGENT")]
    pub user_agent: Option<String>,

    /// `Referer` header sent with the request.
    #[arg(long, env = "TILE_REFERER")]
    pub referer: Option<String>,

    /// Follow HTTP redirects instead of failing on them.
    #[arg(long, default_value_t = false, env = "TILE_FOLLOW_REDIRECTS")]
    pub follow_redirects: bool,

    // =========================================================================
    // Output Configuration
    // =========================================================================
    /// Save the decoded tile as PNG.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a JSON report instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("URL template is required. Set --url or TILE_URL".to_string());
        }

        if self.zoom > MAX_ZOOM {
            return Err(format!("zoom must be at most {}", MAX_ZOOM));
        }

        if self.tile_size == 0 {
            return Err("tile_size must be greater than 0".to_string());
        }

        if self.connect_timeout_ms == 0 {
            return Err("connect_timeout_ms must be greater than 0".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("read_timeout_ms must be greater than 0".to_string());
        }

        if let Some(ref subdomains) = self.subdomains {
            if subdomains.iter().any(|s| s.trim().is_empty()) {
                return Err("subdomains must not contain empty entries".to_string());
            }
        }

        self.fetch_config().validate().map_err(|e| e.to_string())
    }

    /// Connection settings for the fetch.
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default()
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .with_read_timeout(Duration::from_millis(self.read_timeout_ms))
            .with_follow_redirects(self.follow_redirects);

        if let Some(ref user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }
        if let Some(ref referer) = self.referer {
            config = config.with_referer(referer.clone());
        }

        config
    }

    /// Tile source built from the template and subdomains.
    pub fn tile_source(&self) -> Result<UrlTemplateSource, String> {
        let source = UrlTemplateSource::new(self.url.clone()).map_err(|e| e.to_string())?;
        match self.subdomains {
            Some(ref subdomains) => source
                .with_subdomains(subdomains.iter().map(|s| s.trim().to_string()))
                .map_err(|e| e.to_string()),
            None => Ok(source),
        }
    }

    /// The job described by the command line.
    pub fn download_job(&self) -> Result<DownloadJob, String> {
        let tile =
            Tile::new(self.x, self.y, self.zoom, self.tile_size).map_err(|e| e.to_string())?;
        let source = self.tile_source()?;
        Ok(DownloadJob::new(tile, Arc::new(source)).with_alpha(self.alpha))
    }
}

// =============================================================================
// Tests
// =============================================================================
