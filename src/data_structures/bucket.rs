//! Per-tile geometry buckets, as far as the query path reads them.

use std::{collections::BTreeMap, sync::Arc};

use crate::data_structures::{
    instance::ModelInstances, scene_graph::NodeInfo, tile::CanonicalTileId,
};

/// Instanced models of one tile, keyed by model id.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelBucket {
    pub canonical: CanonicalTileId,
    pub instances_per_model: BTreeMap<String, ModelInstances>,
}

impl ModelBucket {
    pub fn new(canonical: CanonicalTileId) -> Self {
        Self {
            canonical,
            instances_per_model: BTreeMap::new(),
        }
    }

    pub fn add_model(&mut self, model_id: &str, instances: ModelInstances) {
        self.instances_per_model.insert(model_id.to_string(), instances);
    }
}

/// Node trees of one tile of a tiled 3D model source.
#[derive(Clone, Debug, PartialEq)]
pub struct Tiled3dModelBucket {
    pub canonical: CanonicalTileId,
    nodes_info: Vec<NodeInfo>,
}

impl Tiled3dModelBucket {
    pub fn new(canonical: CanonicalTileId, nodes_info: Vec<NodeInfo>) -> Self {
        Self {
            canonical,
            nodes_info,
        }
    }

    pub fn get_nodes_info(&self) -> &[NodeInfo] {
        &self.nodes_info
    }
}

/// Shared snapshot of whichever bucket a model layer built for a tile.
#[derive(Clone, Debug)]
pub enum Bucket {
    Model(Arc<ModelBucket>),
    Tiled3dModel(Arc<Tiled3dModelBucket>),
}

impl Bucket {
    pub fn canonical(&self) -> CanonicalTileId {
        match self {
            Bucket::Model(bucket) => bucket.canonical,
            Bucket::Tiled3dModel(bucket) => bucket.canonical,
        }
    }
}
