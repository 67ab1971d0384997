//! Tile identifiers and the tile-space to geographic conversions.

use std::f64::consts::PI;

/// Fixed coordinate range of one tile, independent of zoom.
pub const EXTENT: u32 = 8192;

/// A tile in the canonical (non-wrapped) tile pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalTileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl CanonicalTileId {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at this zoom level.
    pub fn tile_count(&self) -> f64 {
        2f64.powi(i32::from(self.z))
    }
}

/// A canonical tile plus the world copy it is rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnwrappedTileId {
    pub wrap: i32,
    pub canonical: CanonicalTileId,
}

impl UnwrappedTileId {
    pub fn new(wrap: i32, canonical: CanonicalTileId) -> Self {
        Self { wrap, canonical }
    }

    /// X coordinate in tiles, counting across world copies.
    pub fn unwrapped_x(&self) -> f64 {
        f64::from(self.canonical.x) + self.canonical.tile_count() * f64::from(self.wrap)
    }
}

impl From<CanonicalTileId> for UnwrappedTileId {
    fn from(canonical: CanonicalTileId) -> Self {
        Self { wrap: 0, canonical }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

pub fn lng_from_mercator_x(x: f64) -> f64 {
    x * 360.0 - 180.0
}

pub fn lat_from_mercator_y(y: f64) -> f64 {
    let y2 = 180.0 - y * 360.0;
    360.0 / PI * (y2 * PI / 180.0).exp().atan() - 90.0
}

/// Converts an in-tile position (`0..extent`) of tile `id` to longitude/latitude.
pub fn tile_to_lng_lat(id: &CanonicalTileId, point_x: f64, point_y: f64, extent: f64) -> LngLat {
    let tile_count = id.tile_count();
    LngLat {
        lng: lng_from_mercator_x((point_x / extent + f64::from(id.x)) / tile_count),
        lat: lat_from_mercator_y((point_y / extent + f64::from(id.y)) / tile_count),
    }
}
