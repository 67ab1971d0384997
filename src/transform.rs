//! Model-to-clip matrices for instanced placements and node trees.
//!
//! Both variants start from the tile's placement matrix. Instanced models are
//! positioned by their anchor and translation inside the tile; node trees are
//! scaled around their anchor and then walked with every node's own matrix.

use cgmath::{Deg, Matrix4, Vector2, Vector3};

use crate::{camera::CameraTransform, data_structures::tile::UnwrappedTileId, units::UnitConverter};

/// Swaps the Y and Z axes.
///
/// Models are authored Y-up while tile space is Z-up.
pub fn yz_flip_matrix() -> Matrix4<f64> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation (degrees, applied Z then X then Y) and scale, followed by the Y/Z flip.
pub fn rotation_scale_yz_flip_matrix(rotation: Vector3<f64>, scale: Vector3<f64>) -> Matrix4<f64> {
    Matrix4::from_angle_z(Deg(rotation.z))
        * Matrix4::from_angle_x(Deg(rotation.x))
        * Matrix4::from_angle_y(Deg(rotation.y))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
        * yz_flip_matrix()
}

/// Builds transforms for one tile under one camera state.
///
/// The tile matrix is computed once per builder; nothing is cached across
/// builders, so concurrent queries never share scratch state.
pub struct TransformBuilder {
    tile_matrix: Matrix4<f64>,
    proj_matrix: Matrix4<f64>,
    expanded_far_z_proj_matrix: Matrix4<f64>,
    elevation_exaggeration: Option<f64>,
}

impl TransformBuilder {
    /// `extent` is the tile's coordinate range, the same one its anchors use.
    pub fn new(camera: &dyn CameraTransform, tile_id: &UnwrappedTileId, extent: f64) -> Self {
        Self {
            tile_matrix: camera.calculate_pos_matrix(tile_id, extent),
            proj_matrix: camera.proj_matrix(),
            expanded_far_z_proj_matrix: camera.expanded_far_z_proj_matrix(),
            elevation_exaggeration: camera.elevation_exaggeration(),
        }
    }

    pub fn tile_matrix(&self) -> Matrix4<f64> {
        self.tile_matrix
    }

    /// Placement of one instance inside the tile, in tile units.
    ///
    /// `translation` and `scale` are in meters; `units` converts their
    /// horizontal components.
    pub fn instance_model_matrix(
        anchor: (i32, i32),
        translation: Vector3<f64>,
        rotation: Vector3<f64>,
        scale: Vector3<f64>,
        units: &UnitConverter,
    ) -> Matrix4<f64> {
        let translation = units.to_tile_units(translation);
        let scale = units.to_tile_units(scale);
        let position = Vector3::new(
            f64::from(anchor.0) + translation.x,
            f64::from(anchor.1) + translation.y,
            translation.z,
        );
        Matrix4::from_translation(position) * rotation_scale_yz_flip_matrix(rotation, scale)
    }

    /// `proj * tile * model` for an instanced placement.
    pub fn instance_world_view_projection(&self, model_matrix: Matrix4<f64>) -> Matrix4<f64> {
        self.proj_matrix * (self.tile_matrix * model_matrix)
    }

    /// Tile matrix with the node's scale applied around its anchor and the
    /// exaggerated elevation added. Shared by every node of the tree.
    pub fn node_base_matrix(
        &self,
        scale: Vector3<f64>,
        anchor: Vector2<f64>,
        elevation: Option<f64>,
    ) -> Matrix4<f64> {
        let elevation = match (self.elevation_exaggeration, elevation) {
            (Some(exaggeration), Some(elevation)) => elevation * exaggeration,
            _ => 0.0,
        };
        self.tile_matrix
            * Matrix4::from_translation(Vector3::new(
                anchor.x * (scale.x - 1.0),
                anchor.y * (scale.y - 1.0),
                elevation,
            ))
            * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
    }

    /// `expanded_far_z_proj * base * node` for one node of a tree.
    pub fn node_world_view_projection(
        &self,
        base: &Matrix4<f64>,
        node_matrix: &Matrix4<f64>,
    ) -> Matrix4<f64> {
        self.expanded_far_z_proj_matrix * (base * node_matrix)
    }
}
