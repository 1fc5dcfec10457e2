//! Error types for the pose annotation library.

use thiserror::Error;

use crate::transform::{Convention, LinearUnit};

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Unsupported axis tag or malformed numeric input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Camera or object transform cannot be inverted
    #[error("Degenerate transform: {0}")]
    DegenerateTransform(String),

    /// A transform reached a pipeline stage in the wrong convention or unit
    #[error(
        "Convention mismatch: expected {expected_convention:?}/{expected_unit:?}, \
         found {found_convention:?}/{found_unit:?}"
    )]
    ConventionMismatch {
        /// Convention the stage accepts
        expected_convention: Convention,
        /// Unit the stage accepts
        expected_unit: LinearUnit,
        /// Convention the transform was tagged with
        found_convention: Convention,
        /// Unit the transform was tagged with
        found_unit: LinearUnit,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
