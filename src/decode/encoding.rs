//! Content-encoding selection for response bodies.
//!
//! The choice is purely declarative: it follows the `Content-Encoding`
//! header and never looks at the bytes themselves.

use std::io::Read;

use bytes::{Buf, Bytes};
use flate2::read::GzDecoder;

/// How a response body is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentEncoding {
    /// Raw bytes, used for every value other than `gzip`
    #[default]
    Identity,

    /// gzip-compressed body
    Gzip,
}

impl ContentEncoding {
    /// Select the encoding from a `Content-Encoding` header value.
    ///
    /// Only the token `gzip` (ASCII case-insensitive) enables decompression;
    /// anything else, including `deflate` and a missing header, is treated as
    /// uncompressed.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("gzip") => ContentEncoding::Gzip,
            _ => ContentEncoding::Identity,
        }
    }

    /// Wrap a body in the matching decoding reader.
    ///
    /// Dropping the returned reader releases the body and any decompressor
    /// state.
    pub fn wrap(self, body: Bytes) -> Box<dyn Read + Send> {
        match self {
            ContentEncoding::Identity => Box::new(body.reader()),
            ContentEncoding::Gzip => Box::new(GzDecoder::new(body.reader())),
        }
    }
}
