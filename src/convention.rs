//! The fixed, ordered steps between the engine and annotation conventions.
//!
//! Each forward step has a peer inverse named after it (`*_inverse`, or the
//! step itself when it is self-inverse). Every step checks the convention/unit
//! tag of its input and retags its output, so a transform that skips or repeats
//! a step fails with `ConventionMismatch` instead of producing a silently wrong
//! pose.
//!
//! Sign tables, with `S = diag(1, −1, −1)` and `A = diag(−1, 1, −1)`:
//!
//! | step | rotation | translation |
//! |---|---|---|
//! | remap | `S·R·S` | `S·t` |
//! | capture mirror | row 0 negated | X negated |
//! | row alignment | `A·R·S` | `A·t` |
//!
//! All three are sign patterns of the form `diag(a)·R·diag(b)`, so they keep
//! rows orthonormal.

use serde::{Deserialize, Serialize};

use crate::constants::MESH_CORRECTION_ANGLE_DEG;
use crate::coordinate::{
    apply_pivot_rotation, apply_pivot_rotation_inverse, mirror_about_pivot_axis, mirror_about_pivot_axis_inverse,
};
use crate::transform::{Axis, Convention, LinearUnit, Mat3, Pivot, RigidTransform, Vec3};
use crate::Result;

const REMAP_SIGNS: [f64; 3] = [1.0, -1.0, -1.0];
const CAPTURE_MIRROR_SIGNS: [f64; 3] = [-1.0, 1.0, 1.0];
const ROW_ALIGN_SIGNS: [f64; 3] = [-1.0, 1.0, -1.0];

fn diag(signs: [f64; 3]) -> Mat3 {
    Mat3::from_diagonal(&Vec3::from(signs))
}

/// `diag(row_signs) · pose · diag(col_signs)` on the rotation, `diag(row_signs) · t`
fn apply_signs(pose: &RigidTransform, row_signs: [f64; 3], col_signs: [f64; 3]) -> RigidTransform {
    let rows = diag(row_signs);
    RigidTransform {
        rotation: rows * pose.rotation * diag(col_signs),
        translation: rows * pose.translation,
        ..*pose
    }
}

/// Engine (left-handed, Y-up) → annotation (right-handed, Y-down, Z-forward) axis remap
///
/// # Errors
///
/// Returns `ConventionMismatch` unless the input is an engine transform in metres
pub fn remap_engine_to_annotation(pose: &RigidTransform) -> Result<RigidTransform> {
    pose.ensure(Convention::Engine, LinearUnit::Meters)?;
    Ok(apply_signs(pose, REMAP_SIGNS, REMAP_SIGNS).retagged(Convention::Annotation))
}

/// Inverse of [`remap_engine_to_annotation`]
///
/// # Errors
///
/// Returns `ConventionMismatch` unless the input is an annotation transform in metres
pub fn remap_engine_to_annotation_inverse(pose: &RigidTransform) -> Result<RigidTransform> {
    pose.ensure(Convention::Annotation, LinearUnit::Meters)?;
    Ok(apply_signs(pose, REMAP_SIGNS, REMAP_SIGNS).retagged(Convention::Engine))
}

/// Camera-space mirror about X compensating for the mirrored capture image.
/// Self-inverse.
///
/// # Errors
///
/// Returns `ConventionMismatch` unless the input is an annotation transform in metres
pub fn mirror_capture_x(pose: &RigidTransform) -> Result<RigidTransform> {
    pose.ensure(Convention::Annotation, LinearUnit::Meters)?;
    Ok(apply_signs(pose, CAPTURE_MIRROR_SIGNS, [1.0; 3]))
}

/// Metres → millimetres, the only unit change of the forward pipeline
///
/// # Errors
///
/// Returns `ConventionMismatch` unless the input is an annotation transform in metres
pub fn scale_to_millimeters(pose: &RigidTransform) -> Result<RigidTransform> {
    pose.ensure(Convention::Annotation, LinearUnit::Meters)?;
    Ok(pose.with_unit(LinearUnit::Millimeters))
}

/// Millimetres → metres, the only unit change of the inverse pipeline
///
/// # Errors
///
/// Returns `ConventionMismatch` unless the input is an annotation transform in millimetres
pub fn scale_to_millimeters_inverse(pose: &RigidTransform) -> Result<RigidTransform> {
    pose.ensure(Convention::Annotation, LinearUnit::Millimeters)?;
    Ok(pose.with_unit(LinearUnit::Meters))
}

/// Align the row layout with the annotation tool's: rows 0 and 2 and columns 1
/// and 2 negated, translation X and Z negated. Self-inverse.
///
/// # Errors
///
/// Returns `ConventionMismatch` unless the input is an annotation transform in millimetres
pub fn align_row_convention(pose: &RigidTransform) -> Result<RigidTransform> {
    pose.ensure(Convention::Annotation, LinearUnit::Millimeters)?;
    Ok(apply_signs(pose, ROW_ALIGN_SIGNS, REMAP_SIGNS))
}

/// Mesh-specific model-space correction: the authored orientation is undone by a
/// rotation about `correction_axis`, the authored handedness by a mirror about
/// `mirror_axis`, both about the mesh pivot.
///
/// The forward and inverse pipelines must share the same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshCorrection {
    pub correction_axis: Axis,
    pub correction_angle_deg: f64,
    pub mirror_axis: Axis,
}

impl Default for MeshCorrection {
    fn default() -> Self {
        Self {
            correction_axis: Axis::X,
            correction_angle_deg: MESH_CORRECTION_ANGLE_DEG,
            mirror_axis: Axis::X,
        }
    }
}

impl MeshCorrection {
    /// Rotation about the pivot correcting the authored orientation
    ///
    /// # Errors
    ///
    /// Returns `ConventionMismatch` unless the input is an annotation transform in millimetres
    pub fn correct_orientation(&self, pose: &RigidTransform, pivot: &Pivot) -> Result<RigidTransform> {
        pose.ensure(Convention::Annotation, LinearUnit::Millimeters)?;
        Ok(apply_pivot_rotation(pose, pivot, self.correction_axis, self.correction_angle_deg))
    }

    /// Inverse of [`Self::correct_orientation`]
    ///
    /// # Errors
    ///
    /// Returns `ConventionMismatch` unless the input is an annotation transform in millimetres
    pub fn correct_orientation_inverse(&self, pose: &RigidTransform, pivot: &Pivot) -> Result<RigidTransform> {
        pose.ensure(Convention::Annotation, LinearUnit::Millimeters)?;
        Ok(apply_pivot_rotation_inverse(pose, pivot, self.correction_axis, self.correction_angle_deg))
    }

    /// Mirror about the pivot correcting the authored handedness
    ///
    /// # Errors
    ///
    /// Returns `ConventionMismatch` unless the input is an annotation transform in millimetres
    pub fn correct_handedness(&self, pose: &RigidTransform, pivot: &Pivot) -> Result<RigidTransform> {
        pose.ensure(Convention::Annotation, LinearUnit::Millimeters)?;
        Ok(mirror_about_pivot_axis(pose, pivot, self.mirror_axis))
    }

    /// Inverse of [`Self::correct_handedness`]
    ///
    /// # Errors
    ///
    /// Returns `ConventionMismatch` unless the input is an annotation transform in millimetres
    pub fn correct_handedness_inverse(&self, pose: &RigidTransform, pivot: &Pivot) -> Result<RigidTransform> {
        pose.ensure(Convention::Annotation, LinearUnit::Millimeters)?;
        Ok(mirror_about_pivot_axis_inverse(pose, pivot, self.mirror_axis))
    }
}
