//! Response body decoding.
//!
//! A body goes through two stages before it becomes a tile:
//!
//! ```text
//! raw body ──► ContentEncoding::wrap ──► BitmapDecoder::decode ──► TileBitmap
//!              (gzip or passthrough)     (PNG / JPEG, sized,
//!                                         alpha or opaque)
//! ```
//!
//! - [`ContentEncoding`]: header-driven choice between gzip and identity
//! - [`BitmapDecoder`]: decoder collaborator with classified errors
//! - [`ImageBitmapDecoder`]: default decoder built on the `image` crate
//! - [`TileBitmap`]: decoded pixels

mod bitmap;
mod encoding;
mod image_decoder;

pub use bitmap::{BitmapDecoder, TileBitmap};
pub use encoding::ContentEncoding;
pub use image_decoder::ImageBitmapDecoder;
