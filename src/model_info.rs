//! Mesh bounding-volume information and the pivot derived from it.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::constants::MM_PER_METER;
use crate::transform::{Pivot, Vec3};
use crate::{Error, Result};

/// Axis-aligned bounds of a mesh in its own model space, `models_info` layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub diameter: f64,
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub size_x: f64,
    pub size_y: f64,
    pub size_z: f64,
}

impl ModelInfo {
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty vertex list or non-finite vertices
    pub fn from_vertices(vertices: &[Point3<f64>]) -> Result<Self> {
        let first = vertices
            .first()
            .ok_or_else(|| Error::InvalidArgument("Mesh has no vertices".to_string()))?;
        if vertices.iter().any(|v| !v.coords.iter().all(|c| c.is_finite())) {
            return Err(Error::InvalidArgument("Mesh has non-finite vertices".to_string()));
        }

        let (min, max) = vertices.iter().fold((first.coords, first.coords), |(min, max), v| {
            (min.inf(&v.coords), max.sup(&v.coords))
        });
        let size = max - min;
        Ok(Self {
            diameter: size.norm(),
            min_x: min.x,
            min_y: min.y,
            min_z: min.z,
            size_x: size.x,
            size_y: size.y,
            size_z: size.z,
        })
    }

    /// All linear quantities scaled from metres to millimetres
    #[must_use]
    pub fn to_millimeters(&self) -> Self {
        Self {
            diameter: self.diameter * MM_PER_METER,
            min_x: self.min_x * MM_PER_METER,
            min_y: self.min_y * MM_PER_METER,
            min_z: self.min_z * MM_PER_METER,
            size_x: self.size_x * MM_PER_METER,
            size_y: self.size_y * MM_PER_METER,
            size_z: self.size_z * MM_PER_METER,
        }
    }

    /// Bounding-volume centroid `min + size / 2`, in the info's unit
    #[must_use]
    pub fn pivot(&self) -> Pivot {
        let min = Vec3::new(self.min_x, self.min_y, self.min_z);
        let size = Vec3::new(self.size_x, self.size_y, self.size_z);
        Pivot::from(min + size / 2.0)
    }
}
