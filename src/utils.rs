//! Utility functions for buffer loading and numeric conversion.

pub mod image_conversion;
pub mod safe_cast;

pub use image_conversion::{depth_from_luma16, depth_to_luma16, load_depth, load_mask, DepthImage};
