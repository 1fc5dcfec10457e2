//! Helper functions and utilities for tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use nalgebra::Rotation3;
use ndarray::Array2;
use pose_annotation::app::{FrameDescription, TransformDescription};
use pose_annotation::transform::{Pivot, RigidTransform, Vec3};
use pose_annotation::utils::depth_to_luma16;
use pose_annotation::Result;
use proptest::prelude::*;

pub const OBJECT_COLOR: Rgba<u8> = Rgba([0, 200, 255, 255]);
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Engine transform from Euler angles (radians) and a translation in metres
pub fn engine_pose(roll: f64, pitch: f64, yaw: f64, translation: [f64; 3]) -> RigidTransform {
    RigidTransform::engine(
        Rotation3::from_euler_angles(roll, pitch, yaw).into_inner(),
        Vec3::from(translation),
    )
}

/// Random engine transform with a translation inside a few metres of the origin
pub fn engine_pose_strategy() -> impl Strategy<Value = RigidTransform> {
    (
        -3.1..3.1f64,
        -1.5..1.5f64,
        -3.1..3.1f64,
        prop::array::uniform3(-3.0..3.0f64),
    )
        .prop_map(|(roll, pitch, yaw, t)| engine_pose(roll, pitch, yaw, t))
}

/// Random pivot in millimetres
pub fn pivot_strategy() -> impl Strategy<Value = Pivot> {
    prop::array::uniform3(-200.0..200.0f64).prop_map(|[x, y, z]| Pivot::new(x, y, z))
}

/// Mask with a filled object rectangle `[x0, x1) × [y0, y1)`
pub fn rectangle_mask(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            OBJECT_COLOR
        } else {
            BACKGROUND
        }
    })
}

/// Depth buffer at a constant depth in metres
pub fn flat_depth(width: usize, height: usize, meters: f32) -> Array2<f32> {
    Array2::from_elem((height, width), meters)
}

/// Write a frame description, mask and 16-bit depth PNG into `dir`
pub fn write_frame_files(
    dir: &Path,
    frame: &FrameDescription,
    mask: &RgbaImage,
    depth: &Array2<f32>,
) -> Result<(PathBuf, PathBuf, PathBuf)> {
    let frame_path = dir.join("frame.yaml");
    let mask_path = dir.join("mask.png");
    let depth_path = dir.join("depth.png");

    let yaml = serde_yaml::to_string(frame).map_err(|e| pose_annotation::Error::ConfigError(e.to_string()))?;
    std::fs::write(&frame_path, yaml)?;
    mask.save(&mask_path)?;
    depth_to_luma16(depth.view(), 1.0)?.save(&depth_path)?;

    Ok((frame_path, mask_path, depth_path))
}

/// Frame description for the given engine transforms and pivot
pub fn frame_description(
    scene_key: u64,
    camera: &RigidTransform,
    object: &RigidTransform,
    pivot: [f64; 3],
) -> FrameDescription {
    FrameDescription {
        scene_key,
        camera: TransformDescription::from(camera),
        object: TransformDescription::from(object),
        pivot,
        intrinsics: None,
    }
}
