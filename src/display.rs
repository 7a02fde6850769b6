use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("cannot prepare output directory {path}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write view {window}: {source}")]
    Write {
        window: String,
        #[source]
        source: image::ImageError,
    },
}

/// Where annotated views end up, one named window per view.
pub trait DisplaySurface {
    fn show(&mut self, window: &str, image: &DynamicImage) -> Result<(), DisplayError>;
}

/// Writes each window to `<dir>/<window>.png`, replacing the previous frame.
#[derive(Debug)]
pub struct SnapshotDisplay {
    dir: PathBuf,
}

impl SnapshotDisplay {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DisplayError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| DisplayError::Dir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, window: &str) -> PathBuf {
        let name: String = window
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.png", name.to_ascii_lowercase()))
    }
}

impl DisplaySurface for SnapshotDisplay {
    fn show(&mut self, window: &str, image: &DynamicImage) -> Result<(), DisplayError> {
        image
            .save(self.path_for(window))
            .map_err(|source| DisplayError::Write {
                window: window.to_string(),
                source,
            })
    }
}

#[derive(Debug, Default)]
pub struct NullDisplay;

impl DisplaySurface for NullDisplay {
    fn show(&mut self, _window: &str, _image: &DynamicImage) -> Result<(), DisplayError> {
        Ok(())
    }
}
