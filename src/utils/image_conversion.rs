//! Image conversion utilities for mask and depth buffers.

use std::path::Path;

use image::{ImageBuffer, Luma, RgbaImage};
use log::debug;
use ndarray::{Array2, ArrayView2};

use super::safe_cast::{f64_to_u16_clamp, usize_to_u32};
use crate::constants::MM_PER_METER;
use crate::{Error, Result};

/// 16-bit single-channel depth image
pub type DepthImage = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Load a rendered object mask as RGBA
///
/// # Errors
/// * Returns error if the file cannot be read or decoded
pub fn load_mask<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let mask = image::open(path.as_ref())?.to_rgba8();
    debug!("loaded mask {} ({}x{})", path.as_ref().display(), mask.width(), mask.height());
    Ok(mask)
}

/// Convert a 16-bit depth image to metres
///
/// # Arguments
/// * `image` - raw depth, one unit = `depth_scale` millimetres
/// * `depth_scale` - millimetres per raw unit
///
/// # Returns
/// * `Array2<f32>` with shape (height, width)
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Metre depths fit comfortably in f32
pub fn depth_from_luma16(image: &DepthImage, depth_scale: f64) -> Array2<f32> {
    let (width, height) = image.dimensions();
    let meters_per_unit = depth_scale / MM_PER_METER;
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        // Indices come from the image's own dimensions
        let raw = image.get_pixel(x as u32, y as u32)[0];
        (f64::from(raw) * meters_per_unit) as f32
    })
}

/// Convert a depth buffer in metres to a 16-bit depth image; values are rounded
/// and clamped to the u16 range, non-finite values become 0
///
/// # Errors
/// * Returns error if `depth_scale` is not positive
/// * Returns error if the buffer is too large for an image
pub fn depth_to_luma16(depth: ArrayView2<'_, f32>, depth_scale: f64) -> Result<DepthImage> {
    if !(depth_scale.is_finite() && depth_scale > 0.0) {
        return Err(Error::InvalidArgument(format!("Depth scale must be positive, got {depth_scale}")));
    }
    let (rows, cols) = depth.dim();
    let units_per_meter = MM_PER_METER / depth_scale;
    Ok(ImageBuffer::from_fn(usize_to_u32(cols)?, usize_to_u32(rows)?, |x, y| {
        let meters = depth[[y as usize, x as usize]];
        Luma([f64_to_u16_clamp(f64::from(meters) * units_per_meter)])
    }))
}

/// Load a 16-bit depth PNG and convert it to metres
///
/// # Errors
/// * Returns error if the file cannot be read or decoded
pub fn load_depth<P: AsRef<Path>>(path: P, depth_scale: f64) -> Result<Array2<f32>> {
    let raw = image::open(path.as_ref())?.to_luma16();
    debug!(
        "loaded depth {} ({}x{}, scale {})",
        path.as_ref().display(),
        raw.width(),
        raw.height(),
        depth_scale
    );
    Ok(depth_from_luma16(&raw, depth_scale))
}
