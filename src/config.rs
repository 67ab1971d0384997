//! Tunables for the query path.
//!
//! A single [`PickConfig`] is handed to every query. The defaults match the
//! renderer's tile layout, so most callers only ever use `PickConfig::default()`.

use crate::data_structures::tile::EXTENT;

#[derive(Clone, Debug, PartialEq)]
pub struct PickConfig {
    /// Size of the in-tile coordinate range.
    pub tile_extent: f64,
    /// Deepest node level visited when walking a model's node tree. Nodes
    /// below this level are skipped together with their subtree.
    pub max_node_depth: usize,
    /// Lower bound for strictly positive inputs (world size, extent,
    /// pixels per meter) before they enter a division.
    pub min_input: f64,
    /// Projected footprints with a smaller screen area (in square pixels) are
    /// considered degenerate.
    pub min_footprint_area: f64,
    /// Clip-space `w` at or below this value is treated as behind the camera.
    pub clip_w_epsilon: f64,
}

impl PickConfig {
    pub fn new() -> Self {
        Self {
            tile_extent: f64::from(EXTENT),
            max_node_depth: 64,
            min_input: 1e-9,
            min_footprint_area: 1e-9,
            clip_w_epsilon: 1e-7,
        }
    }

    pub fn with_max_node_depth(mut self, depth: usize) -> Self {
        self.max_node_depth = depth;
        self
    }

    pub fn with_tile_extent(mut self, extent: f64) -> Self {
        self.tile_extent = extent;
        self
    }
}

impl Default for PickConfig {
    fn default() -> Self {
        Self::new()
    }
}
