//! Ground-truth pose computation: engine-space camera and object transforms to
//! an object pose in the annotation convention.

use log::debug;

use crate::convention::{
    align_row_convention, mirror_capture_x, remap_engine_to_annotation, scale_to_millimeters, MeshCorrection,
};
use crate::record::PoseRecord;
use crate::transform::{Convention, LinearUnit, Pivot, RigidTransform};
use crate::Result;

/// World-to-camera transform of an engine camera
///
/// # Errors
///
/// Returns `DegenerateTransform` if the camera transform is not invertible and
/// `ConventionMismatch` if it is not an engine transform in metres
pub fn world_to_camera_space(camera_world: &RigidTransform) -> Result<RigidTransform> {
    camera_world.ensure(Convention::Engine, LinearUnit::Meters)?;
    camera_world.ensure_invertible("camera")?;
    camera_world.try_inverse()
}

/// Produces the per-frame ground-truth pose of the target object.
///
/// Runs, in this order: model-to-camera, engine→annotation remap, capture
/// mirror, metres→millimetres, row alignment, mesh orientation correction,
/// mesh handedness correction.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundTruthPoseComputer {
    correction: MeshCorrection,
}

impl GroundTruthPoseComputer {
    #[must_use]
    pub const fn new(correction: MeshCorrection) -> Self {
        Self { correction }
    }

    /// Model-to-camera transform in the engine convention
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTransform` if either transform is singular
    pub fn model_to_camera(
        &self,
        camera_world: &RigidTransform,
        object_world: &RigidTransform,
    ) -> Result<RigidTransform> {
        object_world.ensure(Convention::Engine, LinearUnit::Meters)?;
        object_world.ensure_invertible("object")?;
        world_to_camera_space(camera_world)?.compose(object_world)
    }

    /// Object pose in the annotation convention (millimetres)
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTransform` if the camera or object transform is singular
    pub fn compute_transform(
        &self,
        camera_world: &RigidTransform,
        object_world: &RigidTransform,
        pivot: &Pivot,
    ) -> Result<RigidTransform> {
        let m2c = self.model_to_camera(camera_world, object_world)?;
        debug!("model-to-camera (engine, m): t = {:?}", m2c.translation_array());

        let remapped = remap_engine_to_annotation(&m2c)?;
        let mirrored = mirror_capture_x(&remapped)?;
        let scaled = scale_to_millimeters(&mirrored)?;
        let aligned = align_row_convention(&scaled)?;
        debug!("annotation before mesh correction (mm): t = {:?}", aligned.translation_array());

        let oriented = self.correction.correct_orientation(&aligned, pivot)?;
        let corrected = self.correction.correct_handedness(&oriented, pivot)?;
        debug!("annotation pose (mm): t = {:?}", corrected.translation_array());

        Ok(corrected)
    }

    /// Ground-truth [`PoseRecord`] for `object_id`
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTransform` if the camera or object transform is singular
    pub fn compute(
        &self,
        camera_world: &RigidTransform,
        object_world: &RigidTransform,
        pivot: &Pivot,
        object_id: u32,
    ) -> Result<PoseRecord> {
        let pose = self.compute_transform(camera_world, object_world, pivot)?;
        PoseRecord::from_transform(&pose, object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Mat3, Vec3};
    use crate::Error;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    fn identity_engine() -> RigidTransform {
        RigidTransform::identity(Convention::Engine, LinearUnit::Meters)
    }

    #[test]
    fn test_identity_scenario_full_composite() {
        let computer = GroundTruthPoseComputer::default();
        let pose = computer
            .compute_transform(&identity_engine(), &identity_engine(), &Pivot::origin())
            .unwrap();

        // Y flip on the camera side, −90° about X then X mirror on the model side
        #[rustfmt::skip]
        let expected = Mat3::new(
            -1.0, 0.0, 0.0,
            0.0, 0.0, -1.0,
            0.0, -1.0, 0.0,
        );
        assert_relative_eq!(pose.rotation, expected, epsilon = 1e-12);
        assert_relative_eq!(pose.translation, Vec3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(pose.rotation.determinant(), 1.0, epsilon = 1e-12);
        assert_eq!(pose.convention, Convention::Annotation);
        assert_eq!(pose.unit, LinearUnit::Millimeters);
    }

    #[test]
    fn test_translation_sign_table() {
        // Engine: x right, y up, z forward (m). Annotation: x right, y down, z forward (mm).
        let computer = GroundTruthPoseComputer::default();
        let object = RigidTransform::engine(Mat3::identity(), Vec3::new(0.1, 0.2, 0.5));
        let pose = computer
            .compute_transform(&identity_engine(), &object, &Pivot::origin())
            .unwrap();
        assert_relative_eq!(pose.translation, Vec3::new(100.0, -200.0, 500.0), epsilon = 1e-9);
    }

    #[test]
    fn test_camera_offset_is_removed() {
        let computer = GroundTruthPoseComputer::default();
        let camera = RigidTransform::engine(Mat3::identity(), Vec3::new(1.0, 1.5, -2.0));
        let object = RigidTransform::engine(Mat3::identity(), Vec3::new(1.0, 1.5, -1.0));
        let pose = computer.compute_transform(&camera, &object, &Pivot::origin()).unwrap();
        assert_relative_eq!(pose.translation, Vec3::new(0.0, 0.0, 1000.0), epsilon = 1e-9);
    }

    #[test]
    fn test_pivot_changes_translation_only() {
        let computer = GroundTruthPoseComputer::default();
        let object = RigidTransform::engine(
            Rotation3::from_euler_angles(0.2, 0.3, -0.1).into_inner(),
            Vec3::new(0.05, -0.1, 0.8),
        );
        let at_origin = computer
            .compute_transform(&identity_engine(), &object, &Pivot::origin())
            .unwrap();
        let off_center = computer
            .compute_transform(&identity_engine(), &object, &Pivot::new(10.0, 20.0, -5.0))
            .unwrap();

        assert_relative_eq!(at_origin.rotation, off_center.rotation, epsilon = 1e-12);
        assert!((at_origin.translation - off_center.translation).norm() > 1.0);
    }

    #[test]
    fn test_output_is_proper_rotation() {
        let computer = GroundTruthPoseComputer::default();
        let camera = RigidTransform::engine(
            Rotation3::from_euler_angles(-0.4, 1.1, 0.25).into_inner(),
            Vec3::new(0.3, 1.4, -0.9),
        );
        let object = RigidTransform::engine(
            Rotation3::from_euler_angles(0.9, -0.2, 2.0).into_inner(),
            Vec3::new(-0.1, 0.9, 0.4),
        );
        let pose = computer
            .compute_transform(&camera, &object, &Pivot::new(0.01, 0.05, -0.02))
            .unwrap();
        assert!(pose.is_orthonormal(1e-9));
        assert_relative_eq!(pose.rotation.determinant(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_transforms() {
        let computer = GroundTruthPoseComputer::default();
        let singular = RigidTransform::engine(Mat3::zeros(), Vec3::zeros());

        let camera_err = computer.compute_transform(&singular, &identity_engine(), &Pivot::origin());
        assert!(matches!(camera_err, Err(Error::DegenerateTransform(_))));

        let object_err = computer.compute_transform(&identity_engine(), &singular, &Pivot::origin());
        assert!(matches!(object_err, Err(Error::DegenerateTransform(_))));
    }

    #[test]
    fn test_rejects_annotation_input() {
        let computer = GroundTruthPoseComputer::default();
        let wrong = RigidTransform::identity(Convention::Annotation, LinearUnit::Millimeters);
        let result = computer.compute_transform(&identity_engine(), &wrong, &Pivot::origin());
        assert!(matches!(result, Err(Error::ConventionMismatch { .. })));
    }

    #[test]
    fn test_compute_record_layout() {
        let computer = GroundTruthPoseComputer::default();
        let object = RigidTransform::engine(Mat3::identity(), Vec3::new(0.0, 0.0, 0.75));
        let record = computer
            .compute(&identity_engine(), &object, &Pivot::origin(), 7)
            .unwrap();
        assert_eq!(record.object_id, 7);
        assert_relative_eq!(record.translation[2], 750.0, epsilon = 1e-9);
        assert_relative_eq!(record.rotation[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(record.rotation[5], -1.0, epsilon = 1e-12);
        assert_relative_eq!(record.rotation[7], -1.0, epsilon = 1e-12);
    }
}
