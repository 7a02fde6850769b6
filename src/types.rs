use std::time::Instant;

use image::{GrayImage, RgbImage};

/// A binary mask: every pixel is either 0 or 255.
pub type SkinMask = GrayImage;

#[derive(Clone, Debug)]
pub struct Frame {
    pub image: RgbImage,
    pub sequence: u64,
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(image: RgbImage, sequence: u64) -> Self {
        Self {
            image,
            sequence,
            timestamp: Instant::now(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    Static,
}

impl Direction {
    /// 1 horizontal, 2 vertical, 3 static.
    pub fn code(&self) -> u8 {
        match self {
            Direction::Horizontal => 1,
            Direction::Vertical => 2,
            Direction::Static => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::Static => "static",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Fist,
    WaveHand,
    RaiseHand,
}

impl Gesture {
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::Fist => "Fist",
            Gesture::WaveHand => "Wave Hand",
            Gesture::RaiseHand => "Raise Hand",
        }
    }

    /// A fist is detected from shape alone; the other two come from motion.
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Gesture::Fist)
    }
}

/// Projection bounds of a blob, inclusive on both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

/// Axis-aligned rectangle as `(x, y, width, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// No row or column after the first one crossed the projection
    /// threshold, so there is no blob to outline.
    pub fn is_empty(&self) -> bool {
        self.x2 == 0 || self.y2 == 0
    }

    pub fn corner_rect(&self) -> PixelRect {
        PixelRect {
            x: self.x1,
            y: self.y1,
            width: self.x2.saturating_sub(self.x1) + 1,
            height: self.y2.saturating_sub(self.y1) + 1,
        }
    }

    /// Reads the far corner as a width/height pair, which overshoots the blob.
    pub fn legacy_rect(&self) -> PixelRect {
        PixelRect {
            x: self.x1,
            y: self.y1,
            width: self.x2,
            height: self.y2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BoxMode {
    /// Rectangle spanning the projection bounds.
    #[default]
    Corners,
    /// Treat the far bound as width/height.
    Legacy,
}

impl BoxMode {
    /// `None` when the projections found no blob.
    pub fn rect(&self, bbox: &BoundingBox) -> Option<PixelRect> {
        if bbox.is_empty() {
            return None;
        }
        Some(match self {
            BoxMode::Corners => bbox.corner_rect(),
            BoxMode::Legacy => bbox.legacy_rect(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct FrameAnalysis {
    pub circularity: f32,
    pub direction: Direction,
    pub gesture: Option<Gesture>,
    pub bbox: Option<BoundingBox>,
    pub mask: SkinMask,
}
