//! Frame-level annotation workflow behind the `pose-annotate` binary.
//!
//! A frame is described by a small YAML document holding the engine-space
//! camera and object transforms, the mesh pivot, and optionally the camera
//! intrinsics at the mask resolution:
//!
//! ```yaml
//! camera:
//!   rotation: [1, 0, 0, 0, 1, 0, 0, 0, 1]
//!   translation: [0.0, 0.0, 0.0]
//! object:
//!   rotation: [1, 0, 0, 0, 1, 0, 0, 0, 1]
//!   translation: [0.1, 0.2, 0.5]
//! pivot: [0.0, 0.0, 0.0]
//! ```

use std::path::Path;

use image::RgbaImage;
use log::{debug, info, warn};
use ndarray::ArrayView2;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::Config;
use crate::intrinsics::{CameraIntrinsics, SceneCamera};
use crate::prediction::PredictedPose;
use crate::record::{GroundTruthRecord, GroundTruthRecordBuilder, SceneAnnotations};
use crate::transform::{Mat3, Pivot, RigidTransform, Vec3};
use crate::utils::{load_depth, load_mask};
use crate::{Error, Result};

/// Engine-space transform as written in frame files: rotation row-major,
/// translation in metres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformDescription {
    pub rotation: [f64; 9],
    pub translation: [f64; 3],
}

impl TransformDescription {
    /// Load a transform from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `ConfigError` if it does not parse
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_yaml(path)
    }

    #[must_use]
    pub fn to_engine(&self) -> RigidTransform {
        RigidTransform::engine(Mat3::from_row_slice(&self.rotation), Vec3::from(self.translation))
    }
}

impl From<&RigidTransform> for TransformDescription {
    fn from(pose: &RigidTransform) -> Self {
        Self {
            rotation: pose.rotation_row_major(),
            translation: pose.translation_array(),
        }
    }
}

/// One captured frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDescription {
    /// Scene key; the command line may override it
    #[serde(default)]
    pub scene_key: u64,
    pub camera: TransformDescription,
    pub object: TransformDescription,
    /// Mesh pivot in millimetres
    #[serde(default)]
    pub pivot: [f64; 3],
    #[serde(default)]
    pub intrinsics: Option<CameraIntrinsics>,
}

impl FrameDescription {
    /// Load a frame description from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `ConfigError` if it does not parse
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_yaml(path)
    }

    #[must_use]
    pub fn pivot(&self) -> Pivot {
        Pivot::from(Vec3::from(self.pivot))
    }
}

fn read_yaml<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = std::fs::read_to_string(path.as_ref())?;
    serde_yaml::from_str(&content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse {}: {e}", path.as_ref().display())))
}

/// Annotation workflow configured from a validated [`Config`]
#[derive(Debug, Clone)]
pub struct AnnotationApp {
    config: Config,
}

impl AnnotationApp {
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Ground-truth record for one frame from in-memory buffers
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTransform` for a singular camera or object transform
    pub fn annotate_frame(
        &self,
        frame: &FrameDescription,
        mask: &RgbaImage,
        depth: ArrayView2<'_, f32>,
    ) -> Result<GroundTruthRecord> {
        let pose = self.config.ground_truth_computer().compute(
            &frame.camera.to_engine(),
            &frame.object.to_engine(),
            &frame.pivot(),
            self.config.annotation.object_id,
        )?;
        let statistics = self.config.mask_analyzer().analyze(mask, depth)?;
        if statistics.is_empty() {
            warn!("Scene {}: mask contains no object pixels", frame.scene_key);
        }

        info!(
            "Scene {}: t = {:?} mm, {} object px, visible fraction {:.3}",
            frame.scene_key, pose.translation, statistics.px_count_all, statistics.visib_fract
        );

        GroundTruthRecordBuilder::new()
            .scene_key(frame.scene_key)
            .pose(pose)
            .statistics(statistics)
            .build()
    }

    /// Load a frame, its mask and its depth image and annotate them
    ///
    /// # Errors
    ///
    /// Returns an error if any input cannot be loaded or the frame cannot be annotated
    pub fn annotate_files<P: AsRef<Path>>(
        &self,
        frame_path: P,
        mask_path: P,
        depth_path: P,
        scene_key: Option<u64>,
    ) -> Result<SceneAnnotations> {
        let mut frame = FrameDescription::from_file(frame_path)?;
        if let Some(key) = scene_key {
            frame.scene_key = key;
        }
        let mask = load_mask(mask_path)?;
        let depth = load_depth(depth_path, self.config.depth.depth_scale)?;

        let mut scenes = SceneAnnotations::new();
        scenes.insert(self.annotate_frame(&frame, &mask, depth.view())?);
        if let Some(intrinsics) = &frame.intrinsics {
            let camera = SceneCamera::new(intrinsics.to_cam_k(), self.config.depth.depth_scale);
            scenes.insert_camera(frame.scene_key, camera);
        }
        Ok(scenes)
    }

    /// Engine-space world transform for an estimator reply, or `None` when the
    /// estimator reported no pose
    ///
    /// # Errors
    ///
    /// Returns an error for malformed predictions or a singular camera transform
    pub fn apply_prediction(
        &self,
        prediction: &PredictedPose,
        camera_world: &RigidTransform,
        pivot: &Pivot,
    ) -> Result<Option<RigidTransform>> {
        if prediction.is_null_estimate() {
            warn!("Estimator returned no pose; leaving the object where it is");
            return Ok(None);
        }
        let predicted = prediction.to_transform()?;
        debug!("applying predicted pose t = {:?} mm", predicted.translation_array());
        let world = self.config.pose_applicator().apply_transform(&predicted, camera_world, pivot)?;
        info!("Object world position: {:?} m", world.translation_array());
        Ok(Some(world))
    }
}
