//! Re-applies an externally predicted annotation-convention pose to the scene
//! graph: the exact inverse of [`crate::ground_truth::GroundTruthPoseComputer`].

use log::debug;

use crate::convention::{
    align_row_convention, mirror_capture_x, remap_engine_to_annotation_inverse, scale_to_millimeters_inverse,
    MeshCorrection,
};
use crate::record::PoseRecord;
use crate::transform::{Convention, LinearUnit, Pivot, RigidTransform};
use crate::Result;

/// Converts a predicted pose back into an engine-space world transform.
///
/// Must be built with the same [`MeshCorrection`] and fed the same pivot as the
/// ground-truth side, or the round trip does not close.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseApplicator {
    correction: MeshCorrection,
}

impl PoseApplicator {
    #[must_use]
    pub const fn new(correction: MeshCorrection) -> Self {
        Self { correction }
    }

    /// Model-to-camera transform in the engine convention, undoing the
    /// annotation steps in reverse order
    ///
    /// # Errors
    ///
    /// Returns `ConventionMismatch` unless `predicted` is an annotation
    /// transform in millimetres
    pub fn model_to_camera(&self, predicted: &RigidTransform, pivot: &Pivot) -> Result<RigidTransform> {
        let unmirrored = self.correction.correct_handedness_inverse(predicted, pivot)?;
        let unrotated = self.correction.correct_orientation_inverse(&unmirrored, pivot)?;
        let unaligned = align_row_convention(&unrotated)?;
        let meters = scale_to_millimeters_inverse(&unaligned)?;
        let uncaptured = mirror_capture_x(&meters)?;
        remap_engine_to_annotation_inverse(&uncaptured)
    }

    /// Engine-space world transform of the object for a predicted annotation pose
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTransform` if the camera transform is singular
    pub fn apply_transform(
        &self,
        predicted: &RigidTransform,
        camera_world: &RigidTransform,
        pivot: &Pivot,
    ) -> Result<RigidTransform> {
        camera_world.ensure(Convention::Engine, LinearUnit::Meters)?;
        camera_world.ensure_invertible("camera")?;

        let m2c = self.model_to_camera(predicted, pivot)?;
        debug!("recovered model-to-camera (engine, m): t = {:?}", m2c.translation_array());

        // camera-to-world · model-to-camera = model-to-world
        let model_to_world = camera_world.to_homogeneous() * m2c.to_homogeneous();
        let world = RigidTransform::from_homogeneous(&model_to_world, Convention::Engine, LinearUnit::Meters);
        debug!("object world pose (engine, m): t = {:?}", world.translation_array());
        Ok(world)
    }

    /// Engine-space world transform of the object for a predicted [`PoseRecord`]
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTransform` if the camera transform is singular
    pub fn apply(
        &self,
        predicted: &PoseRecord,
        camera_world: &RigidTransform,
        pivot: &Pivot,
    ) -> Result<RigidTransform> {
        self.apply_transform(&predicted.to_transform(), camera_world, pivot)
    }
}
