//! Tile coordinates in a Web-Mercator style tile pyramid.

use std::fmt;

use crate::error::TileError;

/// Highest zoom level a tile pyramid can address with `u32` coordinates.
pub const MAX_ZOOM: u8 = 30;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// A single tile: grid position, zoom level and pixel size.
///
/// Construction validates that the coordinates lie inside the
/// `2^zoom x 2^zoom` grid, so a `Tile` value is always addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    x: u32,
    y: u32,
    zoom: u8,
    tile_size: u32,
}

impl Tile {
    /// Create a tile, validating zoom, coordinates and size.
    pub fn new(x: u32, y: u32, zoom: u8, tile_size: u32) -> Result<Self, TileError> {
        if zoom > MAX_ZOOM {
            return Err(TileError::InvalidZoom {
                zoom,
                max: MAX_ZOOM,
            });
        }
        if tile_size == 0 {
            return Err(TileError::InvalidTileSize(tile_size));
        }

        let size = grid_size(zoom);
        if u64::from(x) >= size || u64::from(y) >= size {
            return Err(TileError::OutOfBounds { x, y, zoom, size });
        }

        Ok(Self {
            x,
            y,
            zoom,
            tile_size,
        })
    }

    /// Column, 0 at the west edge.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Row, 0 at the north edge.
    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Edge length of the decoded bitmap in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Row counted from the south edge, as TMS servers expect.
    pub fn tms_y(&self) -> u32 {
        // y < 2^zoom, so the subtraction cannot underflow
        (grid_size(self.zoom) - 1 - u64::from(self.y)) as u32
    }

    /// Bing Maps style quadkey; empty at zoom 0.
    pub fn quadkey(&self) -> String {
        let mut key = String::with_capacity(self.zoom as usize);
        for i in (1..=self.zoom).rev() {
            let mask = 1u32 << (i - 1);
            let mut digit = b'0';
            if self.x & mask != 0 {
                digit += 1;
            }
            if self.y & mask != 0 {
                digit += 2;
            }
            key.push(digit as char);
        }
        key
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}@{}px", self.zoom, self.x, self.y, self.tile_size)
    }
}

/// Number of tiles along one axis at `zoom`.
#[inline]
fn grid_size(zoom: u8) -> u64 {
    1u64 << zoom
}
