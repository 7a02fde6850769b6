mod app;
mod config;
mod display;
mod gesture;
mod keys;
mod overlay;
mod pipeline;
mod types;
mod vision;

use anyhow::Result;
use clap::Parser;

use app::FrameLoop;
use config::Args;
use display::{DisplaySurface, NullDisplay, SnapshotDisplay};
use gesture::GestureAnalyzer;
use overlay::{Annotator, find_label_font};
use pipeline::{FrameSource, ImageSequence};

/// Exit status when the capture device cannot be opened.
const OPEN_FAILURE_EXIT: i32 = -1;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_cameras {
        return list_cameras();
    }

    let mut source = build_source(&args)?;
    if let Err(err) = source.open() {
        log::error!("{err}");
        std::process::exit(OPEN_FAILURE_EXIT);
    }
    if !source.is_opened() {
        log::error!("cannot open {}", source.describe());
        std::process::exit(OPEN_FAILURE_EXIT);
    }

    let mut display: Box<dyn DisplaySurface> = if args.no_display {
        Box::new(NullDisplay)
    } else {
        let snapshots = SnapshotDisplay::new(&args.out_dir)?;
        log::info!("writing views to {}", snapshots.dir().display());
        Box::new(snapshots)
    };

    let gesture_cfg = args.gesture_config();
    let annotator = Annotator::new(find_label_font(args.font.as_deref()), gesture_cfg.box_mode);
    let analyzer = GestureAnalyzer::new(gesture_cfg);
    log::info!(
        "reading {} (type q or Esc then Enter to stop), box mode {:?}",
        source.describe(),
        analyzer.config().box_mode
    );

    FrameLoop {
        source: &mut *source,
        display: &mut *display,
        analyzer,
        annotator,
        keys: keys::spawn_stdin_listener(),
        options: args.loop_options(),
    }
    .run()?;

    Ok(())
}

fn build_source(args: &Args) -> Result<Box<dyn FrameSource>> {
    if let Some(dir) = &args.input_dir {
        return Ok(Box::new(ImageSequence::new(dir)));
    }

    #[cfg(feature = "camera-nokhwa")]
    {
        Ok(Box::new(pipeline::CameraCapture::new(args.camera)))
    }

    #[cfg(not(feature = "camera-nokhwa"))]
    {
        anyhow::bail!(
            "camera {} requested but camera support is disabled; use --input-dir",
            args.camera
        )
    }
}

fn list_cameras() -> Result<()> {
    #[cfg(feature = "camera-nokhwa")]
    {
        let cameras = pipeline::available_cameras()?;
        if cameras.is_empty() {
            println!("no cameras found");
        }
        for camera in cameras {
            println!("{}: {}", camera.index, camera.label);
        }
        Ok(())
    }

    #[cfg(not(feature = "camera-nokhwa"))]
    {
        anyhow::bail!("camera support is disabled")
    }
}
