//! Hierarchical model representation used by tiled 3D model buckets.
//!
//! A model is a tree of [`ModelNode`]s, each with its own local matrix and a
//! set of meshes. Tiles list the root nodes they render as [`NodeInfo`]
//! records, together with the feature each node stands for.

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3};

use crate::data_structures::{feature::Feature, model::Mesh};

#[derive(Clone, Debug, PartialEq)]
pub struct ModelNode {
    /// Node-local transform, already composed with its parents by the loader.
    pub matrix: Matrix4<f64>,
    /// Position of the node inside its tile, in tile units.
    pub anchor: Option<Vector2<f64>>,
    /// Ground elevation below the anchor, in meters.
    pub elevation: Option<f64>,
    /// `None` when the node was loaded without mesh data.
    pub meshes: Option<Vec<Mesh>>,
    /// Index into `meshes` of the mesh that only carries light geometry.
    pub light_mesh_index: Option<usize>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(matrix: Matrix4<f64>) -> Self {
        Self {
            matrix,
            anchor: None,
            elevation: None,
            meshes: None,
            light_mesh_index: None,
            children: Vec::new(),
        }
    }

    pub fn with_anchor(mut self, x: f64, y: f64) -> Self {
        self.anchor = Some(Vector2::new(x, y));
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_meshes(mut self, meshes: Vec<Mesh>) -> Self {
        self.meshes = Some(meshes);
        self
    }

    pub fn with_light_mesh(mut self, index: usize) -> Self {
        self.light_mesh_index = Some(index);
        self
    }

    pub fn add_child(&mut self, child: ModelNode) {
        self.children.push(child);
    }

    pub fn get_children(&self) -> &Vec<ModelNode> {
        &self.children
    }

    /// Anchor or the tile origin when the node has none.
    pub fn anchor_or_origin(&self) -> Vector2<f64> {
        self.anchor.unwrap_or(Vector2::new(0.0, 0.0))
    }

    /// Meshes that take part in hit-testing: everything but the light mesh.
    pub fn pickable_meshes(&self) -> impl Iterator<Item = &Mesh> + '_ {
        self.meshes
            .iter()
            .flatten()
            .enumerate()
            .filter(move |(idx, _)| Some(*idx) != self.light_mesh_index)
            .map(|(_, mesh)| mesh)
    }
}

impl Default for ModelNode {
    fn default() -> Self {
        Self::new(Matrix4::identity())
    }
}

/// One renderable root node of a tile and the state evaluated for it.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfo {
    pub node: Arc<ModelNode>,
    /// Set when another source replaces this node; such nodes are never picked.
    pub hidden_by_replacement: bool,
    pub evaluated_scale: Vector3<f64>,
    pub feature: Feature,
}

impl NodeInfo {
    pub fn new(node: Arc<ModelNode>, feature: Feature) -> Self {
        Self {
            node,
            hidden_by_replacement: false,
            evaluated_scale: Vector3::new(1.0, 1.0, 1.0),
            feature,
        }
    }

    pub fn with_scale(mut self, scale: impl Into<Vector3<f64>>) -> Self {
        self.evaluated_scale = scale.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden_by_replacement = true;
        self
    }
}
