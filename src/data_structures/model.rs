//! Model assets and the cache that hands them out.
//!
//! Only the parts of a model that hit-testing needs are kept here: the
//! bounds of every mesh and of the model as a whole. Vertex data stays with
//! whoever renders the model.

use std::{collections::HashMap, sync::Arc};

use crate::data_structures::aabb::Aabb;

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub aabb: Aabb,
}

impl Mesh {
    pub fn new(name: &str, aabb: Aabb) -> Self {
        Self {
            name: name.to_string(),
            aabb,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelAsset {
    pub id: String,
    pub aabb: Aabb,
    pub meshes: Vec<Mesh>,
}

impl ModelAsset {
    pub fn new(id: &str, aabb: Aabb, meshes: Vec<Mesh>) -> Self {
        Self {
            id: id.to_string(),
            aabb,
            meshes,
        }
    }

    /// Builds an asset whose bounds enclose all of its meshes.
    ///
    /// Returns `None` for an empty mesh list since there is nothing to bound.
    pub fn from_meshes(id: &str, meshes: Vec<Mesh>) -> Option<Self> {
        let aabb = meshes
            .iter()
            .map(|mesh| mesh.aabb)
            .reduce(|acc, aabb| acc.union(&aabb))?;
        Some(Self::new(id, aabb, meshes))
    }
}

/// Lookup of loaded model assets by id within a style scope.
pub trait ModelProvider {
    fn get(&self, model_id: &str, scope: &str) -> Option<Arc<ModelAsset>>;
}

/// In-memory [`ModelProvider`] keyed by scope, then model id.
#[derive(Debug, Default)]
pub struct ModelManager {
    models: HashMap<String, HashMap<String, Arc<ModelAsset>>>,
}

impl ModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a model. Returns the replaced asset, if any.
    pub fn add_model(&mut self, scope: &str, model: ModelAsset) -> Option<Arc<ModelAsset>> {
        self.models
            .entry(scope.to_string())
            .or_default()
            .insert(model.id.clone(), Arc::new(model))
    }

    pub fn remove_model(&mut self, scope: &str, model_id: &str) -> Option<Arc<ModelAsset>> {
        self.models.get_mut(scope)?.remove(model_id)
    }

    pub fn len(&self) -> usize {
        self.models.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModelProvider for ModelManager {
    fn get(&self, model_id: &str, scope: &str) -> Option<Arc<ModelAsset>> {
        self.models.get(scope)?.get(model_id).cloned()
    }
}
