//! Conversion of real-world placement units to tile units.
//!
//! Only the horizontal axes are converted. Heights stay in meters because
//! elevation is tracked separately from the tile plane.

use cgmath::Vector3;

/// Formula turning camera state into a meters to tile units factor.
pub trait UnitConversion {
    fn meters_to_tile_units(&self, pixels_per_meter: f64, tile_world_size: f64, extent: f64) -> f64;
}

/// `pixels_per_meter * extent / tile_world_size`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelsPerMeter;

impl UnitConversion for PixelsPerMeter {
    fn meters_to_tile_units(
        &self,
        pixels_per_meter: f64,
        tile_world_size: f64,
        extent: f64,
    ) -> f64 {
        pixels_per_meter * extent / tile_world_size
    }
}

/// A resolved conversion factor for one tile and camera state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitConverter {
    factor: f64,
}

impl UnitConverter {
    /// Inputs below `min_input` are raised to it, so the factor is always finite and positive.
    pub fn new(
        conversion: &dyn UnitConversion,
        pixels_per_meter: f64,
        world_size: f64,
        zoom_level: u8,
        extent: f64,
        min_input: f64,
    ) -> Self {
        let clamp = |v: f64| if v.is_finite() && v > min_input { v } else { min_input };
        let tile_world_size = clamp(clamp(world_size) / 2f64.powi(i32::from(zoom_level)));
        let factor = conversion.meters_to_tile_units(
            clamp(pixels_per_meter),
            tile_world_size,
            clamp(extent),
        );
        let factor = clamp(factor);
        Self { factor }
    }

    pub fn from_factor(factor: f64) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// X/Y converted to tile units, Z kept in meters.
    pub fn to_tile_units(&self, meters: Vector3<f64>) -> Vector3<f64> {
        Vector3::new(meters.x * self.factor, meters.y * self.factor, meters.z)
    }

    pub fn to_meters(&self, tile_units: Vector3<f64>) -> Vector3<f64> {
        Vector3::new(tile_units.x / self.factor, tile_units.y / self.factor, tile_units.z)
    }
}
