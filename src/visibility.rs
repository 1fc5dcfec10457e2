//! Visibility statistics from a flat-colored object mask and a depth buffer.
//!
//! The depth buffer may have a different resolution than the mask; it is
//! resampled onto the mask grid by nearest neighbour before the scan.

use image::{Rgba, RgbaImage};
use log::debug;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::constants::{DEPTH_VALID_MAX, DEPTH_VALID_MIN};
use crate::utils::safe_cast::f64_to_index_clamp;
use crate::{Error, Result};

/// Axis-aligned pixel box, serialised as `[x, y, width, height]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<[u32; 4]> for BoundingBox {
    fn from([x, y, width, height]: [u32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<BoundingBox> for [u32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// Per-frame mask statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaskStatistics {
    /// Box around every object pixel
    pub bbox_obj: BoundingBox,
    /// Box around the object pixels with valid depth
    pub bbox_visib: BoundingBox,
    pub px_count_all: u64,
    pub px_count_valid: u64,
    pub px_count_visib: u64,
    /// `px_count_visib / px_count_all`, 0 for an empty mask
    pub visib_fract: f64,
}

impl MaskStatistics {
    /// No object pixel: the object is not visible in this frame
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.px_count_all == 0
    }
}

/// Open interval of depths (metres) accepted as a physical surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: f32,
    pub max: f32,
}

impl Default for DepthRange {
    fn default() -> Self {
        Self {
            min: DEPTH_VALID_MIN,
            max: DEPTH_VALID_MAX,
        }
    }
}

impl DepthRange {
    /// `min < depth < max`; NaN is never valid
    #[must_use]
    pub fn contains(&self, depth: f32) -> bool {
        depth > self.min && depth < self.max
    }
}

/// Whether a mask pixel belongs to the object: any non-zero color channel
#[must_use]
pub fn is_object_pixel(pixel: &Rgba<u8>) -> bool {
    pixel[0] != 0 || pixel[1] != 0 || pixel[2] != 0
}

/// Nearest-neighbour resample of `depth` (rows = height) onto a `width` × `height` grid
///
/// # Errors
///
/// Returns `InvalidArgument` if `depth` is empty while the target grid is not
pub fn resample_depth(depth: ArrayView2<'_, f32>, width: u32, height: u32) -> Result<Array2<f32>> {
    let (src_h, src_w) = depth.dim();
    let (dst_w, dst_h) = (width as usize, height as usize);
    if dst_w == 0 || dst_h == 0 {
        return Ok(Array2::zeros((dst_h, dst_w)));
    }
    if src_w == 0 || src_h == 0 {
        return Err(Error::InvalidArgument(format!(
            "Cannot resample an empty {src_w}x{src_h} depth buffer onto {dst_w}x{dst_h}"
        )));
    }
    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(depth.to_owned());
    }

    let cols: Vec<usize> = (0..dst_w).map(|x| nearest_index(x, dst_w, src_w)).collect();
    let rows: Vec<usize> = (0..dst_h).map(|y| nearest_index(y, dst_h, src_h)).collect();
    Ok(Array2::from_shape_fn((dst_h, dst_w), |(y, x)| depth[[rows[y], cols[x]]]))
}

/// Source pixel whose extent contains the centre of target pixel `i ∈ [0, dst)`
#[allow(clippy::cast_precision_loss)] // Image dimensions are far below 2^52
fn nearest_index(i: usize, dst: usize, src: usize) -> usize {
    f64_to_index_clamp(((i as f64 + 0.5) * src as f64 / dst as f64).floor(), src)
}

#[derive(Debug, Default)]
struct BoundsAccumulator {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    count: u64,
}

impl BoundsAccumulator {
    fn add(&mut self, x: u32, y: u32) {
        if self.count == 0 {
            (self.min_x, self.min_y, self.max_x, self.max_y) = (x, y, x, y);
        } else {
            self.min_x = self.min_x.min(x);
            self.min_y = self.min_y.min(y);
            self.max_x = self.max_x.max(x);
            self.max_y = self.max_y.max(y);
        }
        self.count += 1;
    }

    fn bounding_box(&self) -> BoundingBox {
        if self.count == 0 {
            BoundingBox::default()
        } else {
            BoundingBox::new(
                self.min_x,
                self.min_y,
                self.max_x - self.min_x + 1,
                self.max_y - self.min_y + 1,
            )
        }
    }
}

/// Computes [`MaskStatistics`] from a rendered mask and a depth buffer in metres
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityMaskAnalyzer {
    depth_range: DepthRange,
}

impl VisibilityMaskAnalyzer {
    #[must_use]
    pub const fn new(depth_range: DepthRange) -> Self {
        Self { depth_range }
    }

    #[must_use]
    pub const fn depth_range(&self) -> &DepthRange {
        &self.depth_range
    }

    /// Scan the mask against the resampled depth buffer
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the depth buffer is empty but the mask is not
    #[allow(clippy::cast_precision_loss)] // Pixel counts are far below 2^52
    pub fn analyze(&self, mask: &RgbaImage, depth: ArrayView2<'_, f32>) -> Result<MaskStatistics> {
        let (width, height) = mask.dimensions();
        let depth = resample_depth(depth, width, height)?;

        let mut object = BoundsAccumulator::default();
        let mut valid = BoundsAccumulator::default();
        for (x, y, pixel) in mask.enumerate_pixels() {
            if !is_object_pixel(pixel) {
                continue;
            }
            object.add(x, y);
            if self.depth_range.contains(depth[[y as usize, x as usize]]) {
                valid.add(x, y);
            }
        }

        // Visible means valid depth; there is no separate occlusion test
        let visible = valid.count;
        let visib_fract = if object.count == 0 {
            0.0
        } else {
            visible as f64 / object.count as f64
        };

        let stats = MaskStatistics {
            bbox_obj: object.bounding_box(),
            bbox_visib: valid.bounding_box(),
            px_count_all: object.count,
            px_count_valid: valid.count,
            px_count_visib: visible,
            visib_fract,
        };
        debug!(
            "mask {}x{}: {} object px, {} visible, fraction {:.3}",
            width, height, stats.px_count_all, stats.px_count_visib, stats.visib_fract
        );
        Ok(stats)
    }
}
