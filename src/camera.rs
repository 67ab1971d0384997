//! Camera state consumed by the query path.
//!
//! Projection matrices are computed by the map's transform and handed in as
//! they are; this module only describes what is read from them and how a tile
//! is placed in world space.

use std::f64::consts::PI;

use cgmath::{Matrix4, Vector3};

use crate::data_structures::tile::UnwrappedTileId;

/// Mean earth radius in meters.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Size of a tile in pixels at its own zoom level.
pub const TILE_SIZE: f64 = 512.0;

/// Everything the query path reads from the map camera.
pub trait CameraTransform {
    fn zoom(&self) -> f64;

    fn pixels_per_meter(&self) -> f64;

    /// World size in pixels at the current zoom.
    fn world_size(&self) -> f64;

    /// Viewport size in pixels.
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Terrain exaggeration, `None` while terrain is disabled.
    fn elevation_exaggeration(&self) -> Option<f64>;

    fn proj_matrix(&self) -> Matrix4<f64>;

    /// Projection with a far plane pushed back far enough to keep tall node
    /// geometry from being clipped.
    fn expanded_far_z_proj_matrix(&self) -> Matrix4<f64>;

    /// Tile units (`0..extent`) to world pixels for the given tile.
    fn calculate_pos_matrix(&self, tile_id: &UnwrappedTileId, extent: f64) -> Matrix4<f64>;
}

/// Pixels per meter at latitude `lat` for a world of `world_size` pixels.
pub fn pixels_per_meter_at(lat: f64, world_size: f64) -> f64 {
    let circumference = 2.0 * PI * EARTH_RADIUS * (lat * PI / 180.0).cos();
    world_size / circumference
}

/// A plain snapshot of the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub zoom: f64,
    pub pixels_per_meter: f64,
    pub world_size: f64,
    pub width: f64,
    pub height: f64,
    pub elevation_exaggeration: Option<f64>,
    pub proj_matrix: Matrix4<f64>,
    pub expanded_far_z_proj_matrix: Matrix4<f64>,
}

impl Camera {
    /// Camera at `zoom` looking at latitude `lat`, with both projections set to `proj_matrix`.
    pub fn new(width: f64, height: f64, zoom: f64, lat: f64, proj_matrix: Matrix4<f64>) -> Self {
        let world_size = TILE_SIZE * 2f64.powf(zoom);
        Self {
            zoom,
            pixels_per_meter: pixels_per_meter_at(lat, world_size),
            world_size,
            width,
            height,
            elevation_exaggeration: None,
            proj_matrix,
            expanded_far_z_proj_matrix: proj_matrix,
        }
    }

    pub fn with_expanded_far_z_proj_matrix(mut self, matrix: Matrix4<f64>) -> Self {
        self.expanded_far_z_proj_matrix = matrix;
        self
    }

    pub fn with_elevation_exaggeration(mut self, exaggeration: f64) -> Self {
        self.elevation_exaggeration = Some(exaggeration);
        self
    }
}

impl CameraTransform for Camera {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    fn world_size(&self) -> f64 {
        self.world_size
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn elevation_exaggeration(&self) -> Option<f64> {
        self.elevation_exaggeration
    }

    fn proj_matrix(&self) -> Matrix4<f64> {
        self.proj_matrix
    }

    fn expanded_far_z_proj_matrix(&self) -> Matrix4<f64> {
        self.expanded_far_z_proj_matrix
    }

    fn calculate_pos_matrix(&self, tile_id: &UnwrappedTileId, extent: f64) -> Matrix4<f64> {
        let scale = self.world_size / tile_id.canonical.tile_count();
        Matrix4::from_translation(Vector3::new(
            tile_id.unwrapped_x() * scale,
            f64::from(tile_id.canonical.y) * scale,
            0.0,
        )) * Matrix4::from_nonuniform_scale(scale / extent, scale / extent, 1.0)
    }
}
