//! Pure-math transform primitives: principal-axis rotations, rotation about a
//! model-space pivot, and mirroring about a plane through a pivot, each with its
//! exact inverse.
//!
//! All operations act in the object's own (model) frame, i.e. they multiply the
//! rotation on the right, and they leave the convention/unit tags untouched.
//! Inputs must be orthonormal; outputs then stay orthonormal to floating-point
//! tolerance.

use crate::transform::{Axis, Mat3, Pivot, RigidTransform};

/// Standard right-handed rotation matrix about a principal axis
#[must_use]
#[rustfmt::skip]
pub fn axis_rotation(axis: Axis, angle_degrees: f64) -> Mat3 {
    let (s, c) = angle_degrees.to_radians().sin_cos();
    match axis {
        Axis::X => Mat3::new(
            1.0, 0.0, 0.0,
            0.0, c, -s,
            0.0, s, c,
        ),
        Axis::Y => Mat3::new(
            c, 0.0, s,
            0.0, 1.0, 0.0,
            -s, 0.0, c,
        ),
        Axis::Z => Mat3::new(
            c, -s, 0.0,
            s, c, 0.0,
            0.0, 0.0, 1.0,
        ),
    }
}

/// Diagonal reflection with `-1` on `axis` and `+1` elsewhere
#[must_use]
pub fn mirror_matrix(axis: Axis) -> Mat3 {
    let mut d = Mat3::identity();
    d[(axis.index(), axis.index())] = -1.0;
    d
}

/// Compose a model-frame rotation about `pivot`:
/// `R1 = R0 · Rcorr`, `t1 = t0 − R0·p + R1·p`
#[must_use]
pub fn apply_pivot_rotation(pose: &RigidTransform, pivot: &Pivot, axis: Axis, angle_degrees: f64) -> RigidTransform {
    let p = pivot.as_vector();
    let rotation = pose.rotation * axis_rotation(axis, angle_degrees);
    let translation = pose.translation - pose.rotation * p + rotation * p;
    RigidTransform {
        rotation,
        translation,
        ..*pose
    }
}

/// Exact inverse of [`apply_pivot_rotation`]:
/// `R0 = R1 · Rcorrᵗ`, `t0 = t1 + R0·p − R1·p`
#[must_use]
pub fn apply_pivot_rotation_inverse(
    pose: &RigidTransform,
    pivot: &Pivot,
    axis: Axis,
    angle_degrees: f64,
) -> RigidTransform {
    let p = pivot.as_vector();
    let rotation = pose.rotation * axis_rotation(axis, angle_degrees).transpose();
    let translation = pose.translation + rotation * p - pose.rotation * p;
    RigidTransform {
        rotation,
        translation,
        ..*pose
    }
}

/// Reflect the pose about the model-frame plane through `pivot` perpendicular to `axis`:
/// `Rm = R0 · D`, `tm = t0 + R0·(I − D)·p`
#[must_use]
pub fn mirror_about_pivot_axis(pose: &RigidTransform, pivot: &Pivot, axis: Axis) -> RigidTransform {
    let d = mirror_matrix(axis);
    let offset = (Mat3::identity() - d) * pivot.as_vector();
    RigidTransform {
        rotation: pose.rotation * d,
        translation: pose.translation + pose.rotation * offset,
        ..*pose
    }
}

/// Exact inverse of [`mirror_about_pivot_axis`]. `D·D = I`, but the offset term
/// has to be rebuilt from the recovered `R0`, not from `Rm`.
#[must_use]
pub fn mirror_about_pivot_axis_inverse(pose: &RigidTransform, pivot: &Pivot, axis: Axis) -> RigidTransform {
    let d = mirror_matrix(axis);
    let rotation = pose.rotation * d;
    let offset = (Mat3::identity() - d) * pivot.as_vector();
    RigidTransform {
        rotation,
        translation: pose.translation - rotation * offset,
        ..*pose
    }
}
