use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{gesture::GestureConfig, types::BoxMode};

#[derive(Debug, Parser)]
#[command(
    name = "skin-gesture-lab",
    about = "Label fist, wave and raised-hand gestures from webcam skin blobs",
    version
)]
pub struct Args {
    /// Zero-based camera index
    #[arg(short, long, default_value = "0")]
    pub camera: u32,

    /// Replay images from this directory instead of opening a camera
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory that receives the Static, Skin and Dynamic views
    #[arg(short, long, default_value = "frames")]
    pub out_dir: PathBuf,

    /// Do not write any views
    #[arg(long)]
    pub no_display: bool,

    /// TrueType font for the gesture label
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// How the bounding box is built from the projection bounds
    #[arg(long, value_enum, default_value_t = BoxMode::Corners)]
    pub box_mode: BoxMode,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// How long each iteration waits for a key (milliseconds)
    #[arg(long, default_value = "30")]
    pub key_wait_ms: u64,

    /// List available cameras and exit
    #[arg(long)]
    pub list_cameras: bool,
}

#[derive(Clone, Debug)]
pub struct LoopOptions {
    pub max_frames: Option<u64>,
    pub key_wait: Duration,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            key_wait: Duration::from_millis(30),
        }
    }
}

impl Args {
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            box_mode: self.box_mode,
            ..GestureConfig::default()
        }
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            max_frames: self.max_frames,
            key_wait: Duration::from_millis(self.key_wait_ms),
        }
    }
}
