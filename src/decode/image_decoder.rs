//! Bitmap decoder backed by the `image` crate.
//!
//! # Error Classification
//!
//! | Situation                                   | Result                     |
//! |---------------------------------------------|----------------------------|
//! | Stream is empty                             | `DecodeError::Corrupted`   |
//! | Stream ends early (`UnexpectedEof`)         | `DecodeError::Corrupted`   |
//! | JPEG without a trailing EOI marker          | `DecodeError::Corrupted`   |
//! | Recognised format, image data is broken     | `DecodeError::Corrupted`   |
//! | Unknown signature / unsupported format      | `DecodeError::Format`      |
//! | Decoder limits or parameters rejected       | `DecodeError::Format`      |
//! | Any other read failure                      | `DecodeError::Io`          |

use std::io::{self, Cursor, Read};

use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use tracing::debug;

use super::bitmap::{BitmapDecoder, TileBitmap};
use crate::error::DecodeError;

/// Decodes PNG and JPEG tiles.
#[derive(Debug, Clone, Default)]
pub struct ImageBitmapDecoder {
    // Stateless; decoding limits use the image crate defaults
}

impl ImageBitmapDecoder {
    pub fn new() -> Self {
        Self {}
    }

    /// Decode an in-memory image.
    pub fn decode_bytes(
        &self,
        data: &[u8],
        tile_size: u32,
        has_alpha: bool,
    ) -> Result<TileBitmap, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Corrupted("stream is empty".to_string()));
        }

        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(classify_io_error)?;

        match reader.format() {
            None => {
                return Err(DecodeError::Format(
                    "unrecognised image signature".to_string(),
                ))
            }
            // The JPEG decoder fills missing scanlines instead of failing,
            // so a cut-off stream has to be caught before decoding.
            Some(ImageFormat::Jpeg) if !has_jpeg_eoi(data) => {
                return Err(DecodeError::Corrupted(
                    "JPEG stream ends before the EOI marker".to_string(),
                ))
            }
            Some(_) => {}
        }

        let image = reader.decode().map_err(classify_image_error)?;

        Ok(TileBitmap::new(normalize(image, tile_size, has_alpha)))
    }
}

impl BitmapDecoder for ImageBitmapDecoder {
    fn decode(
        &self,
        stream: &mut dyn Read,
        tile_size: u32,
        has_alpha: bool,
    ) -> Result<TileBitmap, DecodeError> {
        let mut data = Vec::new();
        stream.read_to_end(&mut data).map_err(classify_io_error)?;
        self.decode_bytes(&data, tile_size, has_alpha)
    }
}

/// Bring a decoded image to the tile's size and pixel layout.
fn normalize(image: DynamicImage, tile_size: u32, has_alpha: bool) -> DynamicImage {
    let image = if image.width() != tile_size || image.height() != tile_size {
        debug!(
            width = image.width(),
            height = image.height(),
            tile_size,
            "Resizing decoded tile"
        );
        image.resize_exact(tile_size, tile_size, FilterType::Triangle)
    } else {
        image
    };

    if has_alpha {
        DynamicImage::ImageRgba8(image.into_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.into_rgb8())
    }
}

/// JPEG end-of-image marker.
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Whether the stream ends with EOI, ignoring trailing padding some servers
/// append (NUL bytes or whitespace).
fn has_jpeg_eoi(data: &[u8]) -> bool {
    let end = data
        .iter()
        .rposition(|b| !matches!(b, 0x00 | b' ' | b'\t' | b'\r' | b'\n'))
        .map_or(0, |i| i + 1);
    data[..end].ends_with(&JPEG_EOI)
}

fn classify_io_error(err: io::Error) -> DecodeError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => DecodeError::Corrupted(err.to_string()),
        _ => DecodeError::Io(err.to_string()),
    }
}

fn classify_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Decoding(e) => DecodeError::Corrupted(e.to_string()),
        ImageError::IoError(e) => classify_io_error(e),
        ImageError::Unsupported(e) => DecodeError::Format(e.to_string()),
        ImageError::Limits(e) => DecodeError::Format(e.to_string()),
        ImageError::Parameter(e) => DecodeError::Format(e.to_string()),
        ImageError::Encoding(e) => DecodeError::Format(e.to_string()),
    }
}

// =============================================================================
// Tests
// =============================================================================
