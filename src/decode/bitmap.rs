use std::fmt;
use std::io::Read;

use image::DynamicImage;

use crate::error::DecodeError;

/// A decoded tile.
///
/// Pixels are RGBA8 for tiles requested with an alpha channel and RGB8
/// otherwise, always `tile_size x tile_size`.
#[derive(Clone)]
pub struct TileBitmap {
    image: DynamicImage,
}

impl TileBitmap {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the pixel layout carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Raw pixel bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_bytes()
    }
}

impl fmt::Debug for TileBitmap {
    // Skip the pixel buffer
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileBitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("color", &self.image.color())
            .finish()
    }
}

/// Turns a byte stream into a tile bitmap.
///
/// Implementations must report truncated or damaged input as
/// [`DecodeError::Corrupted`]; the fetcher relies on that classification to
/// tell transient download problems apart from content that will never
/// decode.
pub trait BitmapDecoder: Send + Sync {
    /// Decode `stream` into a `tile_size x tile_size` bitmap.
    fn decode(
        &self,
        stream: &mut dyn Read,
        tile_size: u32,
        has_alpha: bool,
    ) -> Result<TileBitmap, DecodeError>;
}
