//! Constants used throughout the library

/// Millimetres per metre
pub const MM_PER_METER: f64 = 1000.0;

/// Metres per millimetre
pub const METERS_PER_MM: f64 = 0.001;

/// Model-space correction angle for the authored mesh orientation (degrees)
pub const MESH_CORRECTION_ANGLE_DEG: f64 = -90.0;

/// Lower bound of the valid depth range in metres (exclusive)
pub const DEPTH_VALID_MIN: f32 = 0.0;

/// Upper bound of the valid depth range in metres (exclusive)
pub const DEPTH_VALID_MAX: f32 = 10.0;

/// Default depth scale of 16-bit depth images (millimetres per unit)
pub const DEFAULT_DEPTH_SCALE: f64 = 1.0;

/// Default object identifier written to annotation records
pub const DEFAULT_OBJECT_ID: u32 = 1;

/// Determinant magnitude below which a transform is treated as singular
pub const DEGENERATE_DETERMINANT: f64 = 1e-12;

/// Tolerance used when checking rotation orthonormality
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-4;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
