//! Parsing of pose estimator replies.
//!
//! A reply is `{"position": [x, y, z], "rotation": [...]}` with the position in
//! millimetres and the rotation either 9 row-major values or a quaternion
//! `[x, y, z, w]`, both in the annotation convention.

use nalgebra::{Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::constants::{DEGENERATE_DETERMINANT, EPSILON, ORTHONORMAL_TOLERANCE};
use crate::record::PoseRecord;
use crate::transform::{Convention, LinearUnit, Mat3, RigidTransform, Vec3};
use crate::{Error, Result};

/// Raw estimator reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedPose {
    pub position: [f64; 3],
    pub rotation: Vec<f64>,
}

impl PredictedPose {
    /// Parse a JSON reply
    ///
    /// # Errors
    ///
    /// Returns `Json` if the text is not a valid reply
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Whether the reply is the estimator's "no pose found" answer: a zero
    /// position with an identity quaternion or an all-zero rotation
    #[must_use]
    pub fn is_null_estimate(&self) -> bool {
        let zero_position = self.position.iter().all(|v| *v == 0.0);
        let null_rotation = match self.rotation.as_slice() {
            [x, y, z, w] => *x == 0.0 && *y == 0.0 && *z == 0.0 && *w == 1.0,
            values => values.iter().all(|v| *v == 0.0),
        };
        zero_position && null_rotation
    }

    /// Rotation as a matrix; quaternions are normalised first
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a rotation that is neither 9 nor 4 values,
    /// contains non-finite values, or is a matrix that is scaled, sheared or
    /// reflected, and `DegenerateTransform` for a zero quaternion or a
    /// singular matrix
    pub fn rotation_matrix(&self) -> Result<Mat3> {
        if !self.rotation.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "Predicted rotation must be finite: {:?}",
                self.rotation
            )));
        }
        match self.rotation.as_slice() {
            &[x, y, z, w] => {
                let q = Quaternion::new(w, x, y, z);
                if q.norm() < EPSILON {
                    return Err(Error::DegenerateTransform("Predicted quaternion has zero norm".to_string()));
                }
                Ok(UnitQuaternion::from_quaternion(q).to_rotation_matrix().into_inner())
            }
            values if values.len() == 9 => {
                let rotation = Mat3::from_row_slice(values);
                let det = rotation.determinant();
                if det.abs() < DEGENERATE_DETERMINANT {
                    return Err(Error::DegenerateTransform("Predicted rotation matrix is singular".to_string()));
                }
                let gram = rotation * rotation.transpose();
                let orthonormal = (gram - Mat3::identity()).iter().all(|v| v.abs() <= ORTHONORMAL_TOLERANCE);
                if !orthonormal || (det - 1.0).abs() > ORTHONORMAL_TOLERANCE {
                    return Err(Error::InvalidArgument(format!(
                        "Predicted rotation matrix is not a proper rotation (det {det:.6})"
                    )));
                }
                Ok(rotation)
            }
            values => Err(Error::InvalidArgument(format!(
                "Predicted rotation must have 9 or 4 values, got {}",
                values.len()
            ))),
        }
    }

    /// The prediction as an annotation-convention transform in millimetres
    ///
    /// # Errors
    ///
    /// See [`PredictedPose::rotation_matrix`]
    pub fn to_transform(&self) -> Result<RigidTransform> {
        if !self.position.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "Predicted position must be finite: {:?}",
                self.position
            )));
        }
        Ok(RigidTransform::new(
            self.rotation_matrix()?,
            Vec3::from(self.position),
            Convention::Annotation,
            LinearUnit::Millimeters,
        ))
    }

    /// # Errors
    ///
    /// See [`PredictedPose::rotation_matrix`]
    pub fn into_pose_record(self, object_id: u32) -> Result<PoseRecord> {
        PoseRecord::from_transform(&self.to_transform()?, object_id)
    }
}
