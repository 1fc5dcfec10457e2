//! Ground-truth pose annotation tool: annotate captured frames and apply
//! predicted poses back to the engine scene.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use pose_annotation::app::{AnnotationApp, TransformDescription};
use pose_annotation::config::Config;
use pose_annotation::prediction::PredictedPose;
use pose_annotation::transform::Pivot;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the ground-truth pose and mask statistics of one frame
    Annotate {
        /// Frame description (YAML): camera and object transforms, pivot
        #[arg(long)]
        frame: PathBuf,

        /// Rendered object mask (PNG)
        #[arg(long)]
        mask: PathBuf,

        /// 16-bit depth image (PNG)
        #[arg(long)]
        depth: PathBuf,

        /// Scene key overriding the one in the frame description
        #[arg(long)]
        scene_key: Option<u64>,
    },

    /// Convert a predicted pose back to an engine-space world transform
    Apply {
        /// Estimator reply (JSON)
        #[arg(long)]
        prediction: PathBuf,

        /// Camera world transform (YAML)
        #[arg(long)]
        camera: PathBuf,

        /// Mesh pivot in millimetres, `x,y,z`
        #[arg(long, default_value = "0,0,0")]
        pivot: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    info!("Loading configuration from: {}", path.display());
    match Config::from_file(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Failed to load config file: {}. Using defaults.", e);
            Config::default()
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let app = AnnotationApp::new(load_config(args.config.as_ref())).context("Invalid configuration")?;

    match args.command {
        Command::Annotate {
            frame,
            mask,
            depth,
            scene_key,
        } => {
            let scenes = app
                .annotate_files(&frame, &mask, &depth, scene_key)
                .with_context(|| format!("Failed to annotate {}", frame.display()))?;
            println!("{}", scenes.scene_gt_json()?);
            println!("{}", scenes.scene_gt_info_json()?);
        }
        Command::Apply {
            prediction,
            camera,
            pivot,
        } => {
            let text = std::fs::read_to_string(&prediction)
                .with_context(|| format!("Failed to read {}", prediction.display()))?;
            let prediction = PredictedPose::from_json(&text)?;
            let camera = TransformDescription::from_file(&camera)?.to_engine();
            let pivot: Pivot = pivot.parse()?;

            match app.apply_prediction(&prediction, &camera, &pivot)? {
                Some(world) => println!("{}", serde_json::to_string_pretty(&TransformDescription::from(&world))?),
                None => println!("null"),
            }
        }
    }

    Ok(())
}
