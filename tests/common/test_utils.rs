use std::sync::Arc;

use model_query::{
    Deg, Matrix4, Point3, Vector3,
    camera::Camera,
    data_structures::{
        aabb::Aabb,
        bucket::{Bucket, ModelBucket, Tiled3dModelBucket},
        feature::Feature,
        instance::{InstanceBuffer, InstanceRaw, ModelFeature, ModelInstances},
        model::{ModelAsset, ModelManager},
        scene_graph::NodeInfo,
        tile::{CanonicalTileId, UnwrappedTileId},
    },
    ortho, perspective,
    query::{QueryRegion, QueryTile, TilespaceQuery},
};

pub const SCOPE: &str = "basemap";
pub const MODEL_ID: &str = "tree";
pub const VIEWPORT: f64 = 8192.0;
/// Tile units per meter under [`ortho_camera`].
pub const METERS_TO_TILE: f64 = 10.0;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn root_tile() -> CanonicalTileId {
    CanonicalTileId::new(0, 0, 0)
}

/// Top-down orthographic camera on tile 0/0/0 where screen pixels equal tile
/// units. Higher geometry is nearer to the camera.
pub fn ortho_camera() -> Camera {
    let proj = ortho(0.0, VIEWPORT, VIEWPORT, 0.0, -1000.0, 1000.0);
    Camera {
        zoom: 0.0,
        pixels_per_meter: METERS_TO_TILE,
        world_size: VIEWPORT,
        width: VIEWPORT,
        height: VIEWPORT,
        elevation_exaggeration: None,
        proj_matrix: proj,
        expanded_far_z_proj_matrix: proj,
    }
}

/// Perspective camera 1000 units above the tile center looking straight down.
pub fn perspective_camera() -> Camera {
    let view = Matrix4::look_at_rh(
        Point3::new(4096.0, 4096.0, 1000.0),
        Point3::new(4096.0, 4096.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    );
    let proj = perspective(Deg(60.0), 1.0, 1.0, 10_000.0) * view;
    Camera {
        proj_matrix: proj,
        expanded_far_z_proj_matrix: proj,
        ..ortho_camera()
    }
}

pub fn unit_cube() -> Aabb {
    Aabb::new([-0.5, -0.5, -0.5], [0.5, 0.5, 0.5])
}

pub fn model_manager(aabb: Aabb) -> ModelManager {
    let mut models = ModelManager::new();
    models.add_model(SCOPE, ModelAsset::new(MODEL_ID, aabb, Vec::new()));
    models
}

/// One feature group per entry: `(feature id, records)`.
pub fn flat_bucket(groups: Vec<(i64, Vec<InstanceRaw>)>) -> ModelBucket {
    let records: Vec<InstanceRaw> = groups.iter().flat_map(|(_, r)| r.iter().copied()).collect();
    let mut instances = ModelInstances::new(InstanceBuffer::new(records));
    let mut offset = 0;
    for (id, records) in groups {
        instances
            .add_feature(ModelFeature::new(Feature::with_id(id), offset, records.len()))
            .unwrap();
        offset += records.len();
    }
    let mut bucket = ModelBucket::new(root_tile());
    bucket.add_model(MODEL_ID, instances);
    bucket
}

pub fn point_query(bucket: Option<Bucket>, x: f64, y: f64) -> TilespaceQuery {
    TilespaceQuery::new(
        QueryTile::new(UnwrappedTileId::from(root_tile()), bucket),
        QueryRegion::point(x, y, 0.0),
    )
}

pub fn flat_query(bucket: ModelBucket, x: f64, y: f64) -> TilespaceQuery {
    point_query(Some(Bucket::Model(Arc::new(bucket))), x, y)
}

pub fn tiled_bucket(nodes: Vec<NodeInfo>) -> Tiled3dModelBucket {
    Tiled3dModelBucket::new(root_tile(), nodes)
}
