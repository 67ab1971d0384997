use std::sync::Arc;

use model_query::{
    PickContext,
    config::PickConfig,
    data_structures::{
        bucket::{Bucket, Tiled3dModelBucket},
        feature::Feature,
        instance::InstanceRaw,
        tile::EXTENT,
    },
    layer::{ModelLayer, ModelPaintProperty, PropertyEvaluation},
};

use crate::common::test_utils::*;

mod common;

fn layer_with_models() -> ModelLayer {
    let mut layer = ModelLayer::new("trees", SCOPE);
    layer.set_model_provider(Arc::new(model_manager(unit_cube())));
    layer
}

#[test]
fn should_pad_queries_only_for_tiled_models() {
    let layer = ModelLayer::new("trees", SCOPE);
    let tiled = Bucket::Tiled3dModel(Arc::new(Tiled3dModelBucket::new(root_tile(), Vec::new())));
    let instanced = Bucket::Model(Arc::new(flat_bucket(Vec::new())));

    assert_eq!(layer.query_radius(&tiled), EXTENT - 1);
    assert_eq!(layer.query_radius(&instanced), 0);
}

#[test]
fn should_report_zoom_dependency_of_placement_properties() {
    let mut layer = ModelLayer::new("trees", SCOPE);
    assert!(!layer.is_zoom_dependent());

    layer.set_paint_evaluation(ModelPaintProperty::Opacity, PropertyEvaluation::ZoomDependent);
    assert!(!layer.is_zoom_dependent());

    layer.set_paint_evaluation(ModelPaintProperty::Scale, PropertyEvaluation::DataDriven);
    assert!(!layer.is_zoom_dependent());

    layer.set_paint_evaluation(ModelPaintProperty::Rotation, PropertyEvaluation::ZoomAndDataDriven);
    assert!(layer.is_zoom_dependent());
}

#[test]
fn should_rebuild_bucket_only_for_constant_baked_properties() {
    let layer = ModelLayer::new("trees", SCOPE);
    let constant = PropertyEvaluation::Constant;
    let zoom = PropertyEvaluation::ZoomDependent;
    let data = PropertyEvaluation::DataDriven;

    let rebuilds = |property, old, new| {
        layer.handle_overridable_paint_property_update(property, old, new)
    };

    assert!(rebuilds(ModelPaintProperty::Color, constant, constant));
    assert!(rebuilds(ModelPaintProperty::Translation, constant, zoom));
    assert!(!rebuilds(ModelPaintProperty::Opacity, constant, constant));
    assert!(!rebuilds(ModelPaintProperty::Color, data, constant));
    assert!(!rebuilds(ModelPaintProperty::Scale, constant, data));
}

#[test]
fn should_expose_render_capabilities() {
    let mut layer = ModelLayer::new("trees", SCOPE);
    layer.set_cutoff_fade_range(0.25);

    assert_eq!(layer.program_ids(), vec!["model"]);
    assert!(layer.is_3d());
    assert!(layer.has_shadow_pass() && layer.can_cast_shadows() && layer.has_light_beam_pass());
    assert_eq!(layer.cutoff_range(), 0.25);
    assert_eq!(
        layer.paint_evaluation(ModelPaintProperty::EmissiveStrength),
        PropertyEvaluation::Constant
    );
}

#[test]
fn should_not_match_without_model_provider() {
    let camera = ortho_camera();
    let config = PickConfig::default();
    let ctx = PickContext::new(&camera, &config);
    let layer = ModelLayer::new("trees", SCOPE);
    let query = flat_query(
        flat_bucket(vec![(1, vec![InstanceRaw::new([100.0, 100.0], [0.0; 3])])]),
        100.0,
        100.0,
    );

    assert_eq!(layer.query_intersects_feature(&query, &Feature::with_id(1), &ctx), None);
}

#[test]
fn should_query_features_through_the_layer_scope() {
    let camera = ortho_camera();
    let config = PickConfig::default();
    let ctx = PickContext::new(&camera, &config);
    let query = flat_query(
        flat_bucket(vec![(1, vec![InstanceRaw::new([100.0, 100.0], [0.0; 3])])]),
        100.0,
        100.0,
    );
    let mut other_scope = ModelLayer::new("trees", "imported");
    other_scope.set_model_provider(Arc::new(model_manager(unit_cube())));

    assert!(
        layer_with_models()
            .query_intersects_feature(&query, &Feature::with_id(1), &ctx)
            .is_some()
    );
    assert_eq!(other_scope.query_intersects_feature(&query, &Feature::with_id(1), &ctx), None);
}
