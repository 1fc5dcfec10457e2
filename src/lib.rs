//! Ground-truth 6D pose annotation library.
//!
//! Converts object poses between a rendering engine's scene graph (left-handed,
//! Y-up, metres) and the annotation convention of 6D pose benchmarks
//! (right-handed, Y-down, Z-forward, millimetres), and derives visibility
//! statistics from rendered object masks and depth buffers.
//!
//! The annotation pipeline consists of:
//! 1. Model-to-camera transform from the engine camera and object transforms
//! 2. Fixed convention steps: axis remap, capture mirror, metres to
//!    millimetres, row alignment
//! 3. Mesh correction about the model pivot: orientation, then handedness
//! 4. Mask analysis: bounding boxes, pixel counts and visible fraction
//!
//! [`pose_applicator::PoseApplicator`] runs the pose steps in reverse to place
//! a predicted pose back into the engine scene.
//!
//! # Examples
//!
//! ## Ground-truth pose
//!
//! ```
//! use pose_annotation::ground_truth::GroundTruthPoseComputer;
//! use pose_annotation::transform::{Convention, LinearUnit, Mat3, Pivot, RigidTransform, Vec3};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let camera = RigidTransform::identity(Convention::Engine, LinearUnit::Meters);
//! let object = RigidTransform::engine(Mat3::identity(), Vec3::new(0.1, 0.2, 0.5));
//!
//! let record = GroundTruthPoseComputer::default().compute(&camera, &object, &Pivot::origin(), 1)?;
//! assert!((record.translation[1] + 200.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## Applying a prediction
//!
//! ```
//! use pose_annotation::pose_applicator::PoseApplicator;
//! use pose_annotation::record::PoseRecord;
//! use pose_annotation::transform::{Convention, LinearUnit, Pivot, RigidTransform};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let predicted = PoseRecord {
//!     rotation: [-1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, -1.0, 0.0],
//!     translation: [100.0, -200.0, 500.0],
//!     object_id: 1,
//! };
//! let camera = RigidTransform::identity(Convention::Engine, LinearUnit::Meters);
//!
//! let world = PoseApplicator::default().apply(&predicted, &camera, &Pivot::origin())?;
//! assert!((world.translation.z - 0.5).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! ## Mask statistics
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use ndarray::Array2;
//! use pose_annotation::visibility::VisibilityMaskAnalyzer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut mask = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
//! mask.put_pixel(1, 2, Rgba([255, 0, 0, 255]));
//! let depth = Array2::<f32>::from_elem((2, 2), 1.5);
//!
//! let stats = VisibilityMaskAnalyzer::default().analyze(&mask, depth.view())?;
//! assert_eq!(stats.px_count_visib, 1);
//! # Ok(())
//! # }
//! ```

/// Frame-level annotation workflow used by the binary
pub mod app;

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Fixed engine-to-annotation convention steps and the mesh correction
pub mod convention;

/// Axis rotations and mirrors about a model-space pivot
pub mod coordinate;

/// Error types and result handling
pub mod error;

/// Ground-truth pose computation
pub mod ground_truth;

/// Pinhole camera intrinsics
pub mod intrinsics;

/// Mesh bounding-volume info and pivot derivation
pub mod model_info;

/// Inverse pipeline for predicted poses
pub mod pose_applicator;

/// Pose estimator reply parsing
pub mod prediction;

/// Annotation records and scene documents
pub mod record;

/// Tagged rigid transforms
pub mod transform;

/// Utility functions for buffer loading and numeric conversion
pub mod utils;

/// Mask visibility statistics
pub mod visibility;

pub use error::{Error, Result};
