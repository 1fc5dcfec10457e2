//! Per-frame annotation records and the scene-level documents built from them.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::intrinsics::SceneCamera;
use crate::transform::{Convention, LinearUnit, Mat3, RigidTransform, Vec3};
use crate::visibility::MaskStatistics;
use crate::{Error, Result};

/// Ground-truth pose of one object: rotation row-major and translation in
/// millimetres, both in the annotation convention
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    #[serde(rename = "cam_R_m2c")]
    pub rotation: [f64; 9],
    #[serde(rename = "cam_t_m2c")]
    pub translation: [f64; 3],
    #[serde(rename = "obj_id")]
    pub object_id: u32,
}

impl PoseRecord {
    /// Freeze an annotation-convention transform into a record
    ///
    /// # Errors
    ///
    /// Returns `ConventionMismatch` unless the transform is in the annotation
    /// convention and in millimetres
    pub fn from_transform(pose: &RigidTransform, object_id: u32) -> Result<Self> {
        pose.ensure(Convention::Annotation, LinearUnit::Millimeters)?;
        Ok(Self {
            rotation: pose.rotation_row_major(),
            translation: pose.translation_array(),
            object_id,
        })
    }

    /// The record as a tagged annotation-convention transform
    #[must_use]
    pub fn to_transform(&self) -> RigidTransform {
        RigidTransform::new(
            Mat3::from_row_slice(&self.rotation),
            Vec3::from(self.translation),
            Convention::Annotation,
            LinearUnit::Millimeters,
        )
    }
}

/// One frame's annotation: the object pose plus its mask statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthRecord {
    pub scene_key: u64,
    pub pose: PoseRecord,
    pub statistics: MaskStatistics,
}

/// Structural assembly of a [`GroundTruthRecord`]; the caller supplies the key
#[derive(Debug, Clone, Default)]
pub struct GroundTruthRecordBuilder {
    scene_key: Option<u64>,
    pose: Option<PoseRecord>,
    statistics: Option<MaskStatistics>,
}

impl GroundTruthRecordBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn scene_key(mut self, key: u64) -> Self {
        self.scene_key = Some(key);
        self
    }

    #[must_use]
    pub const fn pose(mut self, pose: PoseRecord) -> Self {
        self.pose = Some(pose);
        self
    }

    #[must_use]
    pub const fn statistics(mut self, statistics: MaskStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` naming the first missing part
    pub fn build(self) -> Result<GroundTruthRecord> {
        let scene_key = self
            .scene_key
            .ok_or_else(|| Error::InvalidArgument("Record is missing its scene key".to_string()))?;
        let pose = self
            .pose
            .ok_or_else(|| Error::InvalidArgument("Record is missing its pose".to_string()))?;
        let statistics = self
            .statistics
            .ok_or_else(|| Error::InvalidArgument("Record is missing its mask statistics".to_string()))?;
        Ok(GroundTruthRecord {
            scene_key,
            pose,
            statistics,
        })
    }
}

/// Records of a capture session keyed by scene key, rendered as the
/// `scene_gt`, `scene_gt_info` and `scene_camera` JSON documents
#[derive(Debug, Clone, Default)]
pub struct SceneAnnotations {
    records: BTreeMap<u64, Vec<GroundTruthRecord>>,
    cameras: BTreeMap<u64, SceneCamera>,
}

impl SceneAnnotations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: GroundTruthRecord) {
        debug!("scene {}: adding record for object {}", record.scene_key, record.pose.object_id);
        self.records.entry(record.scene_key).or_default().push(record);
    }

    pub fn insert_camera(&mut self, scene_key: u64, camera: SceneCamera) {
        self.cameras.insert(scene_key, camera);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self, scene_key: u64) -> impl Iterator<Item = &GroundTruthRecord> {
        self.records.get(&scene_key).into_iter().flatten()
    }

    /// `{"<key>": [{"cam_R_m2c", "cam_t_m2c", "obj_id"}, ...]}`
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialisation fails
    pub fn scene_gt_json(&self) -> Result<String> {
        let doc: BTreeMap<u64, Vec<PoseRecord>> = self
            .records
            .iter()
            .map(|(key, records)| (*key, records.iter().map(|r| r.pose).collect()))
            .collect();
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// `{"<key>": [{"bbox_obj", "bbox_visib", "px_count_all", ...}, ...]}`
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialisation fails
    pub fn scene_gt_info_json(&self) -> Result<String> {
        let doc: BTreeMap<u64, Vec<MaskStatistics>> = self
            .records
            .iter()
            .map(|(key, records)| (*key, records.iter().map(|r| r.statistics).collect()))
            .collect();
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// `{"<key>": {"cam_K", "depth_scale"}}`
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialisation fails
    pub fn scene_camera_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.cameras)?)
    }
}
