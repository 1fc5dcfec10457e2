//! Pinhole camera intrinsics at the working (mask/depth) resolution.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Focal lengths, principal point and resolution in working-grid pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    pub width: u32,
    pub height: u32,
}

impl CameraIntrinsics {
    /// # Errors
    ///
    /// Returns `InvalidArgument` for non-positive focal lengths, non-finite
    /// values or a zero resolution
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64, width: u32, height: u32) -> Result<Self> {
        let intrinsics = Self {
            fx,
            fy,
            cx,
            cy,
            width,
            height,
        };
        intrinsics.validate()?;
        Ok(intrinsics)
    }

    /// Scale raw sensor intrinsics to `width` × `height`. When the sensor's
    /// principal point assumes a flipped image X axis the flip is folded into
    /// `cx` here, before any pose math sees it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the raw intrinsics or the target resolution are invalid
    pub fn from_sensor(raw: &Self, width: u32, height: u32, flip_principal_x: bool) -> Result<Self> {
        raw.validate()?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "Working resolution must be non-zero, got {width}x{height}"
            )));
        }
        let sx = f64::from(width) / f64::from(raw.width);
        let sy = f64::from(height) / f64::from(raw.height);
        let cx = raw.cx * sx;
        Self::new(
            raw.fx * sx,
            raw.fy * sy,
            if flip_principal_x { f64::from(width) - cx } else { cx },
            raw.cy * sy,
            width,
            height,
        )
    }

    fn validate(&self) -> Result<()> {
        let values = [self.fx, self.fy, self.cx, self.cy];
        if !values.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidArgument(format!("Intrinsics must be finite: {values:?}")));
        }
        if self.fx <= 0.0 || self.fy <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "Focal lengths must be positive, got fx={} fy={}",
                self.fx, self.fy
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidArgument(format!(
                "Resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// `K` as 9 values, row-major
    #[must_use]
    pub const fn to_cam_k(&self) -> [f64; 9] {
        [self.fx, 0.0, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0]
    }

    /// Read `fx`, `fy`, `cx`, `cy` out of a row-major `K`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the values do not form a valid camera
    pub fn from_cam_k(cam_k: &[f64; 9], width: u32, height: u32) -> Result<Self> {
        Self::new(cam_k[0], cam_k[4], cam_k[2], cam_k[5], width, height)
    }
}

/// Parse a whitespace-separated 3×3 intrinsics matrix. Both `.` and `,` are
/// accepted as decimal separator.
///
/// # Errors
///
/// Returns `InvalidArgument` unless the text holds exactly 9 numbers
pub fn parse_cam_k(text: &str) -> Result<[f64; 9]> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|e| Error::InvalidArgument(format!("Invalid intrinsics value {token:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    values
        .try_into()
        .map_err(|v: Vec<f64>| Error::InvalidArgument(format!("Expected 9 intrinsics values, got {}", v.len())))
}

/// `scene_camera` entry: `K` row-major and the depth scale of the depth image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneCamera {
    #[serde(rename = "cam_K")]
    pub cam_k: [f64; 9],
    pub depth_scale: f64,
}

impl SceneCamera {
    #[must_use]
    pub const fn new(cam_k: [f64; 9], depth_scale: f64) -> Self {
        Self { cam_k, depth_scale }
    }
}

impl From<&CameraIntrinsics> for SceneCamera {
    fn from(intrinsics: &CameraIntrinsics) -> Self {
        Self::new(intrinsics.to_cam_k(), crate::constants::DEFAULT_DEPTH_SCALE)
    }
}
