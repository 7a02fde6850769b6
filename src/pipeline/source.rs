use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::Frame;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot open {device}: {reason}")]
    Open { device: String, reason: String },
    #[error("{0} is not opened")]
    NotOpened(String),
    #[error("cannot read a frame from {device}: {reason}")]
    Read { device: String, reason: String },
    #[error("cannot decode frame: {0}")]
    Decode(String),
}

/// Anything that yields frames one at a time, like a webcam.
pub trait FrameSource {
    fn open(&mut self) -> Result<(), CaptureError>;

    fn is_opened(&self) -> bool;

    /// `Ok(None)` marks the end of a finite stream.
    fn read(&mut self) -> Result<Option<Frame>, CaptureError>;

    fn describe(&self) -> String;
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Replays still images from a directory in file-name order.
#[derive(Debug)]
pub struct ImageSequence {
    dir: PathBuf,
    files: Option<Vec<PathBuf>>,
    next: usize,
}

impl ImageSequence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: None,
            next: 0,
        }
    }

    fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| {
                        IMAGE_EXTENSIONS
                            .iter()
                            .any(|known| ext.eq_ignore_ascii_case(known))
                    })
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

impl FrameSource for ImageSequence {
    fn open(&mut self) -> Result<(), CaptureError> {
        let files = Self::list_images(&self.dir).map_err(|err| CaptureError::Open {
            device: self.describe(),
            reason: err.to_string(),
        })?;
        log::info!("found {} images in {}", files.len(), self.dir.display());
        self.files = Some(files);
        self.next = 0;
        Ok(())
    }

    fn is_opened(&self) -> bool {
        self.files.is_some()
    }

    fn read(&mut self) -> Result<Option<Frame>, CaptureError> {
        let files = self
            .files
            .as_ref()
            .ok_or_else(|| CaptureError::NotOpened(self.describe()))?;
        let Some(path) = files.get(self.next) else {
            return Ok(None);
        };

        let image = image::open(path).map_err(|err| CaptureError::Read {
            device: path.display().to_string(),
            reason: err.to_string(),
        })?;

        let frame = Frame::new(image.to_rgb8(), self.next as u64);
        self.next += 1;
        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        format!("image sequence {}", self.dir.display())
    }
}
