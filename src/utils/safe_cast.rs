//! Checked numeric conversions between pixel indices, image dimensions and depth samples

use crate::{Error, Result};

/// Safely convert usize to u32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds `u32::MAX`
pub fn usize_to_u32(value: usize) -> Result<u32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidArgument(format!("Value {value} too large to fit in u32")))
}

/// Round and clamp an f64 into the u16 range; non-finite values map to 0
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
#[allow(clippy::cast_sign_loss)] // Clamped to be non-negative
pub fn f64_to_u16_clamp(value: f64) -> u16 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Round an f64 to the nearest valid index of a buffer of length `len`
///
/// Negative and non-finite values map to 0, values past the end to `len - 1`.
/// An empty buffer yields 0.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Buffer lengths are far below 2^52
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
#[allow(clippy::cast_sign_loss)] // Clamped to be non-negative
pub fn f64_to_index_clamp(value: f64, len: usize) -> usize {
    let last = len.saturating_sub(1);
    if !value.is_finite() {
        return 0;
    }
    let clamped = value.round().clamp(0.0, last as f64);
    (clamped as usize).min(last)
}
