//! Per-instance placement data for instanced models.
//!
//! A tile bucket stores one packed record per placed model instance in a
//! shared buffer. Instances that belong to the same source feature form a
//! contiguous run of records that is described by a [`ModelFeature`].

use std::{collections::HashMap, mem};

use anyhow::{anyhow, bail};
use cgmath::Vector3;

use crate::data_structures::feature::{Feature, FeatureId};

/// Number of `f32` slots in one packed record.
pub const INSTANCE_STRIDE: usize = 16;

const ANCHOR_X: usize = 0;
const ANCHOR_Y: usize = 1;
const TRANSLATION: usize = 4;

/**
 * The raw instance is the record exactly as the bucket packs it.
 *
 * Layout (in `f32` slots):
 *
 * 0..2  anchor point inside the tile; only the integer part is a position
 * 2..4  color data, unused by hit-testing
 * 4..7  translation in meters
 * 7..16 per-instance shading data, unused by hit-testing
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    data: [f32; INSTANCE_STRIDE],
}

impl InstanceRaw {
    pub fn new(anchor: [f32; 2], translation: [f32; 3]) -> Self {
        let mut data = [0.0; INSTANCE_STRIDE];
        data[ANCHOR_X] = anchor[0];
        data[ANCHOR_Y] = anchor[1];
        data[TRANSLATION..TRANSLATION + 3].copy_from_slice(&translation);
        Self { data }
    }

    pub fn from_slots(data: [f32; INSTANCE_STRIDE]) -> Self {
        Self { data }
    }

    pub fn raw_anchor(&self) -> [f32; 2] {
        [self.data[ANCHOR_X], self.data[ANCHOR_Y]]
    }

    /// Anchor truncated toward zero, the same discretization the renderer
    /// applies before placing the instance.
    pub fn anchor(&self) -> (i32, i32) {
        (self.data[ANCHOR_X] as i32, self.data[ANCHOR_Y] as i32)
    }

    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(
            f64::from(self.data[TRANSLATION]),
            f64::from(self.data[TRANSLATION + 1]),
            f64::from(self.data[TRANSLATION + 2]),
        )
    }
}

/// The shared record buffer of all instances of one model in a tile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceBuffer {
    records: Vec<InstanceRaw>,
}

impl InstanceBuffer {
    pub fn new(records: Vec<InstanceRaw>) -> Self {
        Self { records }
    }

    /// Reads records from packed little-endian bytes as produced by the bucket
    /// worker. The byte length must be a whole number of records.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let record_size = mem::size_of::<InstanceRaw>();
        if bytes.len() % record_size != 0 {
            bail!(
                "Instance data of {} bytes is not a multiple of the {} byte record size",
                bytes.len(),
                record_size
            );
        }
        let records = bytes
            .chunks_exact(record_size)
            .map(bytemuck::pod_read_unaligned::<InstanceRaw>)
            .collect();
        Ok(Self { records })
    }

    pub fn from_floats(floats: &[f32]) -> anyhow::Result<Self> {
        let records: &[InstanceRaw] = bytemuck::try_cast_slice(floats).map_err(|e| {
            anyhow!(
                "Instance data of {} floats does not split into {} float records: {:?}",
                floats.len(),
                INSTANCE_STRIDE,
                e
            )
        })?;
        Ok(Self {
            records: records.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records `offset..offset + count`, or `None` if the run leaves the buffer.
    pub fn run(&self, offset: usize, count: usize) -> Option<&[InstanceRaw]> {
        let end = offset.checked_add(count)?;
        self.records.get(offset..end)
    }
}

/// All instances placed for one source feature.
///
/// Rotation (degrees) and scale are shared by the whole run; translation and
/// anchor come from each record.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFeature {
    pub feature: Feature,
    pub rotation: Vector3<f64>,
    pub scale: Vector3<f64>,
    pub instanced_data_offset: usize,
    pub instanced_data_count: usize,
}

impl ModelFeature {
    pub fn new(
        feature: Feature,
        instanced_data_offset: usize,
        instanced_data_count: usize,
    ) -> Self {
        Self {
            feature,
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            instanced_data_offset,
            instanced_data_count,
        }
    }

    pub fn with_rotation(mut self, rotation: impl Into<Vector3<f64>>) -> Self {
        self.rotation = rotation.into();
        self
    }

    pub fn with_scale(mut self, scale: impl Into<Vector3<f64>>) -> Self {
        self.scale = scale.into();
        self
    }
}

/// Instances of a single model in a tile, grouped by feature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelInstances {
    pub features: Vec<ModelFeature>,
    pub id_to_features_index: HashMap<FeatureId, usize>,
    pub instanced_data: InstanceBuffer,
}

impl ModelInstances {
    pub fn new(instanced_data: InstanceBuffer) -> Self {
        Self {
            features: Vec::new(),
            id_to_features_index: HashMap::new(),
            instanced_data,
        }
    }

    /// Registers a feature group. Features with an id become reachable
    /// through the id index; a second group for the same id is rejected, as is
    /// a group whose record run does not fit the buffer.
    pub fn add_feature(&mut self, model_feature: ModelFeature) -> anyhow::Result<usize> {
        let offset = model_feature.instanced_data_offset;
        let count = model_feature.instanced_data_count;
        if self.instanced_data.run(offset, count).is_none() {
            bail!(
                "Records {}..{} are out of bounds for an instance buffer of {} records",
                offset,
                offset.saturating_add(count),
                self.instanced_data.len()
            );
        }
        let index = self.features.len();
        if let Some(id) = model_feature.feature.resolved_id() {
            if self.id_to_features_index.contains_key(&id) {
                bail!("Feature id {:?} is already indexed", id);
            }
            self.id_to_features_index.insert(id, index);
        }
        self.features.push(model_feature);
        Ok(index)
    }

    pub fn feature_for_id(&self, id: &FeatureId) -> Option<&ModelFeature> {
        self.id_to_features_index
            .get(id)
            .and_then(|&index| self.features.get(index))
    }

    /// The packed records of a feature group, `None` if its run is malformed.
    pub fn records(&self, model_feature: &ModelFeature) -> Option<&[InstanceRaw]> {
        self.instanced_data.run(
            model_feature.instanced_data_offset,
            model_feature.instanced_data_count,
        )
    }
}
