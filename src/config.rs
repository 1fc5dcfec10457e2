//! Configuration management for the pose annotation pipeline

use crate::constants::{
    DEFAULT_DEPTH_SCALE, DEFAULT_OBJECT_ID, DEPTH_VALID_MAX, DEPTH_VALID_MIN, MESH_CORRECTION_ANGLE_DEG,
};
use crate::convention::MeshCorrection;
use crate::ground_truth::GroundTruthPoseComputer;
use crate::pose_applicator::PoseApplicator;
use crate::transform::Axis;
use crate::visibility::{DepthRange, VisibilityMaskAnalyzer};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model-space mesh correction shared by both pose pipelines
    pub pose: PoseConfig,

    /// Valid depth range for mask analysis
    pub visibility: VisibilityConfig,

    /// Depth image encoding
    pub depth: DepthConfig,

    /// Annotation record settings
    pub annotation: AnnotationConfig,
}

/// Mesh correction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Axis of the orientation correction
    pub correction_axis: Axis,

    /// Orientation correction angle in degrees
    pub correction_angle_deg: f64,

    /// Axis of the handedness mirror
    pub mirror_axis: Axis,
}

/// Depth validity range in metres; both bounds are exclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub min_depth: f32,
    pub max_depth: f32,
}

/// Depth image configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Millimetres per raw depth unit
    pub depth_scale: f64,
}

/// Annotation output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Object id written to every record
    pub object_id: u32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            correction_axis: Axis::X,
            correction_angle_deg: MESH_CORRECTION_ANGLE_DEG,
            mirror_axis: Axis::X,
        }
    }
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            min_depth: DEPTH_VALID_MIN,
            max_depth: DEPTH_VALID_MAX,
        }
    }
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            depth_scale: DEFAULT_DEPTH_SCALE,
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            object_id: DEFAULT_OBJECT_ID,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `ConfigError` if it does not parse
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialisation fails and `Io` if the file cannot be written
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Mesh correction for the forward and inverse pose pipelines
    #[must_use]
    pub fn mesh_correction(&self) -> MeshCorrection {
        MeshCorrection {
            correction_axis: self.pose.correction_axis,
            correction_angle_deg: self.pose.correction_angle_deg,
            mirror_axis: self.pose.mirror_axis,
        }
    }

    #[must_use]
    pub fn depth_range(&self) -> DepthRange {
        DepthRange {
            min: self.visibility.min_depth,
            max: self.visibility.max_depth,
        }
    }

    #[must_use]
    pub fn ground_truth_computer(&self) -> GroundTruthPoseComputer {
        GroundTruthPoseComputer::new(self.mesh_correction())
    }

    #[must_use]
    pub fn pose_applicator(&self) -> PoseApplicator {
        PoseApplicator::new(self.mesh_correction())
    }

    #[must_use]
    pub fn mask_analyzer(&self) -> VisibilityMaskAnalyzer {
        VisibilityMaskAnalyzer::new(self.depth_range())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if !self.pose.correction_angle_deg.is_finite() {
            return Err(Error::ConfigError("Correction angle must be finite".to_string()));
        }

        let VisibilityConfig { min_depth, max_depth } = self.visibility;
        if !min_depth.is_finite() || !max_depth.is_finite() {
            return Err(Error::ConfigError("Depth bounds must be finite".to_string()));
        }
        if min_depth >= max_depth {
            return Err(Error::ConfigError(format!(
                "Minimum depth ({min_depth}) must be below maximum depth ({max_depth})"
            )));
        }

        if !(self.depth.depth_scale.is_finite() && self.depth.depth_scale > 0.0) {
            return Err(Error::ConfigError("Depth scale must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Pose Annotation Configuration

# Mesh correction applied about the model pivot
pose:
  correction_axis: x
  correction_angle_deg: -90.0
  mirror_axis: x

# Valid depth range in metres (exclusive)
visibility:
  min_depth: 0.0
  max_depth: 10.0

# Millimetres per raw depth unit
depth:
  depth_scale: 1.0

# Annotation records
annotation:
  object_id: 1
"#;
