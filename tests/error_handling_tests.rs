//! Error handling tests for all modules

use image::RgbaImage;
use ndarray::Array2;
use pose_annotation::{
    app::{AnnotationApp, FrameDescription},
    config::Config,
    coordinate::axis_rotation,
    ground_truth::{world_to_camera_space, GroundTruthPoseComputer},
    intrinsics::parse_cam_k,
    model_info::ModelInfo,
    pose_applicator::PoseApplicator,
    prediction::PredictedPose,
    transform::{Axis, Convention, LinearUnit, Mat3, Pivot, RigidTransform, Vec3},
    visibility::VisibilityMaskAnalyzer,
    Error,
};

#[test]
fn test_axis_parsing_errors() {
    assert!(matches!("w".parse::<Axis>(), Err(Error::InvalidArgument(_))));
    assert!(matches!(Axis::try_from('q'), Err(Error::InvalidArgument(_))));
    assert!(Axis::from_index(3).is_err());

    // Valid tags still work in any case
    assert_eq!("Y".parse::<Axis>().unwrap(), Axis::Y);
    assert_eq!(Axis::try_from('z').unwrap(), Axis::Z);
    let r = axis_rotation(Axis::Z, 0.0);
    assert_eq!(r, Mat3::identity());
}

#[test]
fn test_degenerate_transforms() {
    let singular = RigidTransform::engine(Mat3::zeros(), Vec3::zeros());
    let identity = RigidTransform::identity(Convention::Engine, LinearUnit::Meters);

    assert!(matches!(world_to_camera_space(&singular), Err(Error::DegenerateTransform(_))));

    let computer = GroundTruthPoseComputer::default();
    assert!(matches!(
        computer.compute(&singular, &identity, &Pivot::origin(), 1),
        Err(Error::DegenerateTransform(_))
    ));
    assert!(matches!(
        computer.compute(&identity, &singular, &Pivot::origin(), 1),
        Err(Error::DegenerateTransform(_))
    ));

    let nan_camera = RigidTransform::engine(Mat3::identity(), Vec3::new(f64::NAN, 0.0, 0.0));
    assert!(matches!(
        computer.compute(&nan_camera, &identity, &Pivot::origin(), 1),
        Err(Error::DegenerateTransform(_))
    ));
}

#[test]
fn test_convention_mismatch() {
    let annotation = RigidTransform::identity(Convention::Annotation, LinearUnit::Millimeters);
    let engine = RigidTransform::identity(Convention::Engine, LinearUnit::Meters);

    // Forward pipeline takes engine transforms only
    let result = GroundTruthPoseComputer::default().compute(&annotation, &engine, &Pivot::origin(), 1);
    assert!(matches!(result, Err(Error::ConventionMismatch { .. })));

    // Inverse pipeline takes an annotation pose and an engine camera
    let applicator = PoseApplicator::default();
    assert!(matches!(
        applicator.apply_transform(&engine, &engine, &Pivot::origin()),
        Err(Error::ConventionMismatch { .. })
    ));
    assert!(matches!(
        applicator.apply_transform(&annotation, &annotation, &Pivot::origin()),
        Err(Error::ConventionMismatch { .. })
    ));
}

#[test]
fn test_malformed_inputs() {
    assert!(matches!("1,2".parse::<Pivot>(), Err(Error::InvalidArgument(_))));
    assert!(matches!("1,2,x".parse::<Pivot>(), Err(Error::InvalidArgument(_))));
    assert!(parse_cam_k("").is_err());
    assert!(ModelInfo::from_vertices(&[]).is_err());
    assert!(matches!(PredictedPose::from_json("not json"), Err(Error::Json(_))));

    let empty_depth = Array2::<f32>::zeros((0, 0));
    let mask = RgbaImage::new(4, 4);
    assert!(matches!(
        VisibilityMaskAnalyzer::default().analyze(&mask, empty_depth.view()),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_file_errors() {
    assert!(matches!(Config::from_file("/nonexistent/config.yaml"), Err(Error::Io(_))));
    assert!(matches!(FrameDescription::from_file("/nonexistent/frame.yaml"), Err(Error::Io(_))));

    let dir = tempfile::tempdir().unwrap();
    let frame_path = dir.path().join("frame.yaml");
    std::fs::write(&frame_path, "camera: [1, 2, 3]\n").unwrap();
    assert!(matches!(FrameDescription::from_file(&frame_path), Err(Error::ConfigError(_))));

    let app = AnnotationApp::new(Config::default()).unwrap();
    let missing = dir.path().join("missing.png");
    assert!(app.annotate_files(&frame_path, &missing, &missing, None).is_err());
}

#[test]
fn test_error_messages() {
    let err = "w".parse::<Axis>().unwrap_err();
    assert!(err.to_string().contains("Invalid argument"));

    let annotation = RigidTransform::identity(Convention::Annotation, LinearUnit::Meters);
    let err = GroundTruthPoseComputer::default()
        .compute(&annotation, &annotation, &Pivot::origin(), 1)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Engine"));
    assert!(message.contains("Annotation"));
}
