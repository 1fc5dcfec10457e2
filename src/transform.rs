//! Rigid transforms tagged with the convention and linear unit they are expressed in.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{DEGENERATE_DETERMINANT, METERS_PER_MM, MM_PER_METER};
use crate::{Error, Result};

/// 3×3 matrix of `f64`
pub type Mat3 = Matrix3<f64>;
/// 4×4 homogeneous matrix of `f64`
pub type Mat4 = Matrix4<f64>;
/// 3-vector of `f64`
pub type Vec3 = Vector3<f64>;

/// Principal axis tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[serde(alias = "X")]
    X,
    #[serde(alias = "Y")]
    Y,
    #[serde(alias = "Z")]
    Z,
}

impl Axis {
    /// Row/column index of the axis (X = 0, Y = 1, Z = 2)
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Axis for a row/column index
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for any index outside `0..=2`
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Self::X),
            1 => Ok(Self::Y),
            2 => Ok(Self::Z),
            other => Err(Error::InvalidArgument(format!("Unsupported axis index: {other}"))),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(Error::InvalidArgument(format!("Unsupported axis: {s:?}"))),
        }
    }
}

impl TryFrom<char> for Axis {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'x' => Ok(Self::X),
            'y' => Ok(Self::Y),
            'z' => Ok(Self::Z),
            _ => Err(Error::InvalidArgument(format!("Unsupported axis: {c:?}"))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// Coordinate convention a transform is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convention {
    /// Rendering engine scene graph: left-handed, Y-up
    Engine,
    /// Benchmark annotation: right-handed, Y-down, Z-forward
    Annotation,
}

/// Linear unit of a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinearUnit {
    Meters,
    Millimeters,
}

impl LinearUnit {
    /// Factor converting a length in `self` to a length in `target`
    #[must_use]
    pub fn factor_to(self, target: Self) -> f64 {
        match (self, target) {
            (Self::Meters, Self::Millimeters) => MM_PER_METER,
            (Self::Millimeters, Self::Meters) => METERS_PER_MM,
            _ => 1.0,
        }
    }
}

/// Rotation + translation tagged with its convention and linear unit.
///
/// Maps model coordinates `x` to `rotation * x + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    pub rotation: Mat3,
    pub translation: Vec3,
    pub convention: Convention,
    pub unit: LinearUnit,
}

impl RigidTransform {
    #[must_use]
    pub const fn new(rotation: Mat3, translation: Vec3, convention: Convention, unit: LinearUnit) -> Self {
        Self {
            rotation,
            translation,
            convention,
            unit,
        }
    }

    /// Engine-convention transform in metres, the form the scene graph hands over
    #[must_use]
    pub const fn engine(rotation: Mat3, translation: Vec3) -> Self {
        Self::new(rotation, translation, Convention::Engine, LinearUnit::Meters)
    }

    #[must_use]
    pub fn identity(convention: Convention, unit: LinearUnit) -> Self {
        Self::new(Mat3::identity(), Vec3::zeros(), convention, unit)
    }

    /// Build from a homogeneous matrix; the bottom row is ignored
    #[must_use]
    pub fn from_homogeneous(m: &Mat4, convention: Convention, unit: LinearUnit) -> Self {
        let rotation = m.fixed_view::<3, 3>(0, 0).into_owned();
        let translation = m.fixed_view::<3, 1>(0, 3).into_owned();
        Self::new(rotation, translation, convention, unit)
    }

    /// Homogeneous 4×4 form `[R t; 0 1]`
    #[must_use]
    pub fn to_homogeneous(&self) -> Mat4 {
        let mut m = Mat4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }

    /// Fail with `ConventionMismatch` unless tagged with `convention` and `unit`
    ///
    /// # Errors
    ///
    /// Returns `ConventionMismatch` when either tag differs
    pub fn ensure(&self, convention: Convention, unit: LinearUnit) -> Result<()> {
        if self.convention == convention && self.unit == unit {
            Ok(())
        } else {
            Err(Error::ConventionMismatch {
                expected_convention: convention,
                expected_unit: unit,
                found_convention: self.convention,
                found_unit: self.unit,
            })
        }
    }

    /// Rescale the translation into `unit` and retag
    #[must_use]
    pub fn with_unit(self, unit: LinearUnit) -> Self {
        let factor = self.unit.factor_to(unit);
        Self {
            translation: self.translation * factor,
            unit,
            ..self
        }
    }

    /// Same rotation and translation under another convention tag
    #[must_use]
    pub const fn retagged(self, convention: Convention) -> Self {
        Self { convention, ..self }
    }

    /// Fail with `DegenerateTransform` if the transform is not finite or not invertible
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTransform` for non-finite entries or a near-zero determinant
    pub fn ensure_invertible(&self, what: &str) -> Result<()> {
        if !self.rotation.iter().chain(self.translation.iter()).all(|v| v.is_finite()) {
            return Err(Error::DegenerateTransform(format!("{what} transform has non-finite entries")));
        }
        let det = self.rotation.determinant();
        if det.abs() < DEGENERATE_DETERMINANT {
            return Err(Error::DegenerateTransform(format!(
                "{what} transform is singular (det = {det:e})"
            )));
        }
        Ok(())
    }

    /// Inverse transform
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTransform` if the transform is not invertible
    pub fn try_inverse(&self) -> Result<Self> {
        self.ensure_invertible("input")?;
        let inverse = self
            .to_homogeneous()
            .try_inverse()
            .ok_or_else(|| Error::DegenerateTransform("homogeneous matrix is singular".to_string()))?;
        Ok(Self::from_homogeneous(&inverse, self.convention, self.unit))
    }

    /// `self ∘ other`: apply `other` first, then `self`
    ///
    /// # Errors
    ///
    /// Returns `ConventionMismatch` when the two transforms carry different tags
    pub fn compose(&self, other: &Self) -> Result<Self> {
        other.ensure(self.convention, self.unit)?;
        Ok(Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
            ..*self
        })
    }

    /// Rotation as 9 values, row-major
    #[must_use]
    #[rustfmt::skip]
    pub fn rotation_row_major(&self) -> [f64; 9] {
        let r = &self.rotation;
        [
            r[(0, 0)], r[(0, 1)], r[(0, 2)],
            r[(1, 0)], r[(1, 1)], r[(1, 2)],
            r[(2, 0)], r[(2, 1)], r[(2, 2)],
        ]
    }

    #[must_use]
    pub fn translation_array(&self) -> [f64; 3] {
        [self.translation.x, self.translation.y, self.translation.z]
    }

    /// Whether every row has unit norm and rows are mutually orthogonal within `tolerance`
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let gram = self.rotation * self.rotation.transpose();
        (gram - Mat3::identity()).iter().all(|v| v.abs() <= tolerance)
    }

    /// Angle in radians of the relative rotation between `self` and `other`
    #[must_use]
    pub fn rotation_angle_to(&self, other: &Self) -> f64 {
        let relative = self.rotation.transpose() * other.rotation;
        let cos = ((relative.trace() - 1.0) / 2.0).clamp(-1.0, 1.0);
        cos.acos()
    }
}

/// Model-space reference point (mesh bounding-volume centroid) for corrective
/// rotations and mirrors.
///
/// The forward and inverse pose pipelines must be given the same pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot(pub Vec3);

impl Pivot {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vec3::new(x, y, z))
    }

    #[must_use]
    pub fn origin() -> Self {
        Self(Vec3::zeros())
    }

    #[must_use]
    pub const fn as_vector(&self) -> &Vec3 {
        &self.0
    }
}

impl From<Vec3> for Pivot {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl FromStr for Pivot {
    type Err = Error;

    /// Parse `x,y,z`
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|e| Error::InvalidArgument(format!("Invalid pivot component {part:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        match values.as_slice() {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(Error::InvalidArgument(format!(
                "Pivot needs 3 components, got {}",
                values.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    #[test]
    fn test_axis_parsing() {
        assert_eq!("x".parse::<Axis>().unwrap(), Axis::X);
        assert_eq!(" Z ".parse::<Axis>().unwrap(), Axis::Z);
        assert_eq!(Axis::try_from('y').unwrap(), Axis::Y);
        assert!(matches!("w".parse::<Axis>(), Err(Error::InvalidArgument(_))));
        assert!(matches!(Axis::from_index(3), Err(Error::InvalidArgument(_))));
        assert_eq!(Axis::from_index(1).unwrap(), Axis::Y);
    }

    #[test]
    fn test_unit_conversion() {
        let t = RigidTransform::engine(Mat3::identity(), Vec3::new(0.1, -0.2, 1.5));
        let mm = t.with_unit(LinearUnit::Millimeters);
        assert_relative_eq!(mm.translation, Vec3::new(100.0, -200.0, 1500.0), epsilon = 1e-9);
        assert_eq!(mm.unit, LinearUnit::Millimeters);

        let back = mm.with_unit(LinearUnit::Meters);
        assert_relative_eq!(back.translation, t.translation, epsilon = 1e-12);

        // Converting into the unit it already has is a no-op
        let same = t.with_unit(LinearUnit::Meters);
        assert_eq!(same.translation, t.translation);
    }

    #[test]
    fn test_inverse_and_compose() {
        let rotation = Rotation3::from_euler_angles(0.3, -0.2, 1.1).into_inner();
        let t = RigidTransform::engine(rotation, Vec3::new(1.0, 2.0, 3.0));
        let inv = t.try_inverse().unwrap();
        let product = t.compose(&inv).unwrap();
        assert_relative_eq!(product.rotation, Mat3::identity(), epsilon = 1e-12);
        assert_relative_eq!(product.translation, Vec3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_singular_transform_is_degenerate() {
        let t = RigidTransform::engine(Mat3::zeros(), Vec3::zeros());
        assert!(matches!(t.try_inverse(), Err(Error::DegenerateTransform(_))));

        let mut nan = RigidTransform::engine(Mat3::identity(), Vec3::zeros());
        nan.translation.x = f64::NAN;
        assert!(matches!(nan.try_inverse(), Err(Error::DegenerateTransform(_))));
    }

    #[test]
    fn test_compose_rejects_mixed_tags() {
        let a = RigidTransform::identity(Convention::Engine, LinearUnit::Meters);
        let b = RigidTransform::identity(Convention::Annotation, LinearUnit::Millimeters);
        assert!(matches!(a.compose(&b), Err(Error::ConventionMismatch { .. })));
    }

    #[test]
    fn test_homogeneous_roundtrip() {
        let rotation = Rotation3::from_euler_angles(-0.7, 0.4, 0.1).into_inner();
        let t = RigidTransform::engine(rotation, Vec3::new(-0.5, 0.25, 2.0));
        let back = RigidTransform::from_homogeneous(&t.to_homogeneous(), Convention::Engine, LinearUnit::Meters);
        assert_eq!(back, t);
    }

    #[test]
    fn test_row_major_layout() {
        let r = Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        let t = RigidTransform::engine(r, Vec3::zeros());
        assert_eq!(t.rotation_row_major(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_pivot_parsing() {
        let p: Pivot = "0.1, -2, 3.5".parse().unwrap();
        assert_eq!(p, Pivot::new(0.1, -2.0, 3.5));
        assert!("1,2".parse::<Pivot>().is_err());
        assert!("1,a,3".parse::<Pivot>().is_err());
    }

    #[test]
    fn test_rotation_angle_to() {
        let a = RigidTransform::engine(Rotation3::from_euler_angles(0.2, -0.1, 0.4).into_inner(), Vec3::zeros());
        let turn = Rotation3::from_axis_angle(&Vec3::z_axis(), 0.3).into_inner();
        let b = RigidTransform::engine(a.rotation * turn, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(a.rotation_angle_to(&b), 0.3, epsilon = 1e-9);
        assert_relative_eq!(b.rotation_angle_to(&a), 0.3, epsilon = 1e-9);
        assert!(a.rotation_angle_to(&a).abs() < 1e-6);
    }
}
