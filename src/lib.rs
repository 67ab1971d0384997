//! model-query
//!
//! Screen-space hit-testing of 3D models placed on map tiles. Given a hover
//! or click region, the crate answers whether an instanced model or a tiled
//! model node tree intersects it and at which depth, so overlapping
//! candidates can be resolved to the nearest one. Nothing is rendered and no
//! GPU resources are touched; the camera's matrices come in as plain values.
//!
//! High-level modules
//! - `camera`: the camera state read by queries and tile placement matrices
//! - `config`: tunables of the query path
//! - `data_structures`: tiles, buckets, model assets, instances and node trees
//! - `layer`: the model layer's query surface and paint-property state
//! - `pick`: the two query entry points and depth resolution
//! - `projection`: projection of bounding boxes to screen space and overlap tests
//! - `query`: screen-space query regions
//! - `transform`: model-to-clip matrix construction
//! - `units`: meters to tile units conversion
//!

pub mod camera;
pub mod config;
pub mod data_structures;
pub mod layer;
pub mod pick;
pub mod projection;
pub mod query;
pub mod transform;
pub mod units;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use pick::{MatchedFeature, PickContext, load_matching_feature, query_intersects_feature};
