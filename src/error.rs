use thiserror::Error;

/// Errors describing an invalid tile or a tile source that cannot serve it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Zoom level exceeds what a tile pyramid can address
    #[error("Invalid zoom level {zoom}: must be at most {max}")]
    InvalidZoom { zoom: u8, max: u8 },

    /// Tile coordinates fall outside the grid for the zoom level
    #[error("Tile ({x}, {y}) out of bounds at zoom {zoom}: grid is {size}x{size}")]
    OutOfBounds { x: u32, y: u32, zoom: u8, size: u64 },

    /// Tile size of zero pixels
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(u32),

    /// The source does not serve this zoom level
    #[error("Zoom level {zoom} not served by {source_id} (range {min}..={max})")]
    ZoomOutOfRange {
        zoom: u8,
        min: u8,
        max: u8,
        source_id: String,
    },

    /// URL template is unusable
    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),

    /// Template expansion did not produce a valid URL
    #[error("Invalid tile URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Errors produced while decoding a tile image.
///
/// `Corrupted` is the only variant the fetcher treats as recoverable: the
/// stream was recognised but ended early or contained broken data, which is
/// what an interrupted download looks like.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The stream was truncated or its image data is damaged
    #[error("Corrupted input stream: {0}")]
    Corrupted(String),

    /// The stream is not an image format this decoder handles
    #[error("Unsupported image format: {0}")]
    Format(String),

    /// Reading the stream failed for a reason other than truncation
    #[error("I/O error while decoding: {0}")]
    Io(String),
}

/// Definitive failures of a single tile fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Fetch configuration cannot be applied (raised before any network call)
    #[error("Invalid fetch configuration: {0}")]
    InvalidConfig(String),

    /// Download job is malformed (raised before any network call)
    #[error("Invalid download job: {0}")]
    InvalidJob(String),

    /// Tile source could not produce a URL
    #[error("Tile source error: {0}")]
    Tile(#[from] TileError),

    /// No transport is registered for the URL scheme
    #[error("Unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { scheme: String, url: String },

    /// Connect or read exceeded its configured timeout
    #[error("Timed out fetching {url}: {message}")]
    Timeout { url: String, message: String },

    /// Connection refused, DNS failure, TLS failure, redirect loop...
    #[error("Connection error for {url}: {message}")]
    Connection { url: String, message: String },

    /// Server answered with something other than 200 OK
    #[error("HTTP response code={code} for {url}")]
    Status { code: u16, url: String },

    /// The response body ended before its declared length
    #[error("Response body truncated for {url}: {message}")]
    Truncated { url: String, message: String },

    /// Other I/O failure (local files, unreadable streams)
    #[error("I/O error for {url}: {message}")]
    Io { url: String, message: String },

    /// The body was read but is not a decodable tile
    #[error("Decode error for {url}: {source}")]
    Decode { url: String, source: DecodeError },
}

impl FetchError {
    /// HTTP status code carried by a protocol error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this failure is a connect/read timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }

    /// Whether the failure was detected before any network activity.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidConfig(_)
                | FetchError::InvalidJob(_)
                | FetchError::Tile(_)
                | FetchError::UnsupportedScheme { .. }
        )
    }
}
