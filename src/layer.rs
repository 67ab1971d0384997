//! The model layer as seen by feature queries.
//!
//! Paint properties that influence placement are tracked as an explicit
//! [`ModelPaintProperty`] set, each mapped to how its current value is
//! evaluated. Queries consult that state instead of looking properties up by
//! name.

use std::{collections::HashMap, sync::Arc};

use crate::{
    data_structures::{
        bucket::Bucket,
        feature::Feature,
        model::ModelProvider,
        tile::EXTENT,
    },
    pick::{PickContext, query_intersects_feature},
    query::TilespaceQuery,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelPaintProperty {
    Color,
    ColorMixIntensity,
    Rotation,
    Scale,
    Translation,
    EmissiveStrength,
    /// Applied at draw time, never baked.
    Opacity,
}

impl ModelPaintProperty {
    /// Properties whose values are baked into the bucket's vertex data.
    pub fn is_baked_into_vertices(&self) -> bool {
        matches!(
            self,
            ModelPaintProperty::Color
                | ModelPaintProperty::ColorMixIntensity
                | ModelPaintProperty::Rotation
                | ModelPaintProperty::Scale
                | ModelPaintProperty::Translation
                | ModelPaintProperty::EmissiveStrength
        )
    }
}

/// How a paint property value is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PropertyEvaluation {
    #[default]
    Constant,
    /// Depends on zoom only.
    ZoomDependent,
    /// Depends on feature data only.
    DataDriven,
    /// Depends on both zoom and feature data.
    ZoomAndDataDriven,
}

impl PropertyEvaluation {
    pub fn is_zoom_dependent(&self) -> bool {
        matches!(
            self,
            PropertyEvaluation::ZoomDependent | PropertyEvaluation::ZoomAndDataDriven
        )
    }

    pub fn is_data_driven(&self) -> bool {
        matches!(
            self,
            PropertyEvaluation::DataDriven | PropertyEvaluation::ZoomAndDataDriven
        )
    }
}

pub struct ModelLayer {
    pub id: String,
    pub scope: String,
    models: Option<Arc<dyn ModelProvider + Send + Sync>>,
    paint: HashMap<ModelPaintProperty, PropertyEvaluation>,
    cutoff_fade_range: f64,
}

impl ModelLayer {
    pub fn new(id: &str, scope: &str) -> Self {
        Self {
            id: id.to_string(),
            scope: scope.to_string(),
            models: None,
            paint: HashMap::new(),
            cutoff_fade_range: 0.0,
        }
    }

    pub fn set_model_provider(&mut self, models: Arc<dyn ModelProvider + Send + Sync>) {
        self.models = Some(models);
    }

    pub fn set_paint_evaluation(
        &mut self,
        property: ModelPaintProperty,
        evaluation: PropertyEvaluation,
    ) {
        self.paint.insert(property, evaluation);
    }

    pub fn paint_evaluation(&self, property: ModelPaintProperty) -> PropertyEvaluation {
        self.paint.get(&property).copied().unwrap_or_default()
    }

    pub fn set_cutoff_fade_range(&mut self, range: f64) {
        self.cutoff_fade_range = range;
    }

    pub fn program_ids(&self) -> Vec<&'static str> {
        vec!["model"]
    }

    pub fn is_3d(&self) -> bool {
        true
    }

    pub fn has_shadow_pass(&self) -> bool {
        true
    }

    pub fn can_cast_shadows(&self) -> bool {
        true
    }

    pub fn has_light_beam_pass(&self) -> bool {
        true
    }

    pub fn cutoff_range(&self) -> f64 {
        self.cutoff_fade_range
    }

    /// Extra query padding in tile units. Tiled model nodes may reach into
    /// neighbouring tiles, so their buckets are queried with a full tile of padding.
    pub fn query_radius(&self, bucket: &Bucket) -> u32 {
        match bucket {
            Bucket::Tiled3dModel(_) => EXTENT - 1,
            Bucket::Model(_) => 0,
        }
    }

    pub fn is_zoom_dependent(&self) -> bool {
        [
            ModelPaintProperty::Scale,
            ModelPaintProperty::Rotation,
            ModelPaintProperty::Translation,
        ]
        .iter()
        .any(|&property| self.paint_evaluation(property).is_zoom_dependent())
    }

    /// Whether a programmatic paint update has to rebuild the bucket.
    ///
    /// Data-driven values on either side are re-evaluated per feature anyway.
    pub fn handle_overridable_paint_property_update(
        &self,
        property: ModelPaintProperty,
        old_value: PropertyEvaluation,
        new_value: PropertyEvaluation,
    ) -> bool {
        if old_value.is_data_driven() || new_value.is_data_driven() {
            return false;
        }
        property.is_baked_into_vertices()
    }

    /// Nearest depth at which `feature` intersects the query, `None` if it
    /// doesn't or no model provider is attached.
    pub fn query_intersects_feature(
        &self,
        query: &TilespaceQuery,
        feature: &Feature,
        ctx: &PickContext<'_>,
    ) -> Option<f64> {
        let models = self.models.as_deref()?;
        query_intersects_feature(query, feature, models, &self.scope, ctx)
    }
}
