//! Hit-testing of model instances against a screen-space query.
//!
//! Two entry points cover the two ways a tile can carry models:
//!
//! - [`query_intersects_feature`] resolves a source feature against the
//!   instanced models of a [`ModelBucket`]. Every instance placed for the
//!   feature is tested and the nearest depth wins.
//! - [`load_matching_feature`] tests one root node of a
//!   [`Tiled3dModelBucket`] and its whole node tree.
//!
//! Both follow the same steps: build a model-to-clip matrix per candidate,
//! project the candidate's bounding box to screen space, test it against the
//! query and keep the smallest depth. Missing data of any kind is answered
//! with `None` ("nothing picked") because this runs on every pointer event and
//! must never abort the caller.
//!
//! Diagnostics are emitted as `trace` events under the `model_query` target.

use instant::Instant;
use log::{Level, log_enabled, trace, warn};

use crate::{
    camera::CameraTransform,
    config::PickConfig,
    data_structures::{
        bucket::{Bucket, ModelBucket, Tiled3dModelBucket},
        feature::Feature,
        model::ModelProvider,
        scene_graph::ModelNode,
        tile::{LngLat, tile_to_lng_lat},
    },
    projection::AabbProjector,
    query::TilespaceQuery,
    transform::TransformBuilder,
    units::{PixelsPerMeter, UnitConversion, UnitConverter},
};

pub(crate) const LOG_TARGET: &str = "model_query";

/// Camera, tunables and unit conversion shared by all queries of one event.
#[derive(Clone, Copy)]
pub struct PickContext<'a> {
    pub camera: &'a dyn CameraTransform,
    pub config: &'a PickConfig,
    pub conversion: &'a dyn UnitConversion,
}

impl<'a> PickContext<'a> {
    pub fn new(camera: &'a dyn CameraTransform, config: &'a PickConfig) -> Self {
        Self {
            camera,
            config,
            conversion: &PixelsPerMeter,
        }
    }

    /// Swaps the meters to tile units formula.
    pub fn with_conversion(mut self, conversion: &'a dyn UnitConversion) -> Self {
        self.conversion = conversion;
        self
    }

    fn projector(&self) -> AabbProjector {
        AabbProjector::new(self.camera.width(), self.camera.height(), self.config)
    }
}

/// A node tree hit by a query.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedFeature {
    pub feature: Feature,
    /// Nearest normalized device depth of all hit meshes.
    pub intersection_z: f64,
    /// Geographic position of the node's anchor.
    pub position: LngLat,
}

/// Nearest depth at which any instance of `feature` intersects the query.
///
/// The tile's bucket is searched model by model (in model id order); the
/// first model that indexes the feature's id decides the answer.
pub fn query_intersects_feature(
    query: &TilespaceQuery,
    feature: &Feature,
    models: &dyn ModelProvider,
    scope: &str,
    ctx: &PickContext<'_>,
) -> Option<f64> {
    let start = log_enabled!(target: LOG_TARGET, Level::Trace).then(Instant::now);
    let Some(Bucket::Model(bucket)) = query.tile.get_bucket() else {
        trace!(target: LOG_TARGET, "tile {:?} has no model bucket", query.tile.tile_id);
        return None;
    };
    let result = intersect_bucket(bucket, query, feature, models, scope, ctx);
    if let Some(start) = start {
        trace!(
            target: LOG_TARGET,
            "feature {:?} resolved to {:?} in {:?}",
            feature.id,
            result,
            start.elapsed()
        );
    }
    result
}

fn intersect_bucket(
    bucket: &ModelBucket,
    query: &TilespaceQuery,
    feature: &Feature,
    models: &dyn ModelProvider,
    scope: &str,
    ctx: &PickContext<'_>,
) -> Option<f64> {
    let feature_id = feature.resolved_id()?;
    let (model_id, instances, model_feature) =
        bucket
            .instances_per_model
            .iter()
            .find_map(|(model_id, instances)| {
                instances
                    .feature_for_id(&feature_id)
                    .map(|model_feature| (model_id, instances, model_feature))
            })?;
    let Some(model) = models.get(model_id, scope) else {
        trace!(target: LOG_TARGET, "model {} is not loaded in scope {:?}", model_id, scope);
        return None;
    };
    let Some(records) = instances.records(model_feature) else {
        warn!(
            target: LOG_TARGET,
            "Feature {:?} of model {} points at records {}..+{} outside the instance buffer",
            feature_id,
            model_id,
            model_feature.instanced_data_offset,
            model_feature.instanced_data_count
        );
        return None;
    };

    let camera = ctx.camera;
    let units = UnitConverter::new(
        ctx.conversion,
        camera.pixels_per_meter(),
        camera.world_size(),
        query.tile.tile_id.canonical.z,
        ctx.config.tile_extent,
        ctx.config.min_input,
    );
    let transforms = TransformBuilder::new(camera, &query.tile.tile_id, ctx.config.tile_extent);
    let projector = ctx.projector();

    records
        .iter()
        .filter_map(|record| {
            let anchor = record.anchor();
            let model_matrix = TransformBuilder::instance_model_matrix(
                anchor,
                record.translation(),
                model_feature.rotation,
                model_feature.scale,
                &units,
            );
            let world_view_projection = transforms.instance_world_view_projection(model_matrix);
            let depth = projector.query_intersects_projected_aabb(
                &query.region,
                &world_view_projection,
                &model.aabb,
            );
            trace!(
                target: LOG_TARGET,
                "model {} feature {:?} anchor {:?} meters_to_tile_units {} depth {:?}",
                model_id,
                feature_id,
                anchor,
                units.factor(),
                depth
            );
            depth
        })
        .reduce(f64::min)
}

/// Tests the node tree at `feature_index` of a tiled model bucket.
///
/// Hidden nodes and nodes without mesh data never match. Each node's light
/// mesh is left out of the test.
pub fn load_matching_feature(
    bucket: &Tiled3dModelBucket,
    feature_index: usize,
    query: &TilespaceQuery,
    ctx: &PickContext<'_>,
) -> Option<MatchedFeature> {
    let node_info = bucket.get_nodes_info().get(feature_index)?;
    if node_info.hidden_by_replacement || node_info.node.meshes.is_none() {
        return None;
    }

    let node = &node_info.node;
    let transforms =
        TransformBuilder::new(ctx.camera, &query.tile.tile_id, ctx.config.tile_extent);
    let base = transforms.node_base_matrix(
        node_info.evaluated_scale,
        node.anchor_or_origin(),
        node.elevation,
    );
    let projector = ctx.projector();

    let intersection_z = visit_nodes(node, ctx.config.max_node_depth, |n| {
        let world_view_projection = transforms.node_world_view_projection(&base, &n.matrix);
        n.pickable_meshes()
            .filter_map(|mesh| {
                projector.query_intersects_projected_aabb(
                    &query.region,
                    &world_view_projection,
                    &mesh.aabb,
                )
            })
            .reduce(f64::min)
    })?;

    let anchor = node.anchor_or_origin();
    let position = tile_to_lng_lat(
        &query.tile.tile_id.canonical,
        anchor.x,
        anchor.y,
        ctx.config.tile_extent,
    );
    trace!(
        target: LOG_TARGET,
        "node {} of tile {:?} hit at depth {} ({:?})",
        feature_index,
        bucket.canonical,
        intersection_z,
        position
    );
    Some(MatchedFeature {
        feature: node_info.feature.clone(),
        intersection_z,
        position,
    })
}

/// Walks `root` and its descendants depth first and folds `test` to the
/// minimum. Levels deeper than `max_depth` are skipped.
fn visit_nodes<F>(root: &ModelNode, max_depth: usize, mut test: F) -> Option<f64>
where
    F: FnMut(&ModelNode) -> Option<f64>,
{
    let mut min_depth: Option<f64> = None;
    let mut stack: Vec<(&ModelNode, usize)> = vec![(root, 0)];
    while let Some((node, level)) = stack.pop() {
        if level > max_depth {
            warn!(
                target: LOG_TARGET,
                "Skipping model node subtree below level {}, the tree is deeper than allowed",
                max_depth
            );
            continue;
        }
        if let Some(depth) = test(node) {
            min_depth = Some(min_depth.map_or(depth, |min| min.min(depth)));
        }
        stack.extend(node.get_children().iter().rev().map(|child| (child, level + 1)));
    }
    min_depth
}
