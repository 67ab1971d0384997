//! Data the query path reads: tiles, buckets, models and their placements.
//!
//! - `aabb` holds axis-aligned bounding boxes
//! - `bucket` contains the per-tile snapshots of instanced and tiled models
//! - `feature` holds source features and the ids they are indexed by
//! - `instance` holds packed per-instance placement records
//! - `model` contains model assets and the asset cache
//! - `scene_graph` holds the node trees of tiled 3D models
//! - `tile` contains tile ids and tile to geographic conversion

pub mod aabb;
pub mod bucket;
pub mod feature;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod tile;
