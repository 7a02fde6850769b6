use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_text_mut},
    rect::Rect,
};

use crate::types::{BoxMode, Frame, FrameAnalysis, Gesture, PixelRect};

pub const STATIC_WINDOW: &str = "Static";
pub const SKIN_WINDOW: &str = "Skin";
pub const DYNAMIC_WINDOW: &str = "Dynamic";

const LABEL_ORIGIN: (i32, i32) = (100, 100);
const LABEL_HEIGHT: f32 = 80.0;
const LABEL_COLOR: Rgb<u8> = Rgb([155, 255, 200]);
const BOX_COLOR: Luma<u8> = Luma([255]);
const BOX_THICKNESS: u32 = 2;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read font {}", path.display()))?;
    FontVec::try_from_vec(bytes)
        .with_context(|| format!("{} is not a usable font", path.display()))
}

/// Explicit path first, then well-known system fonts. `None` disables labels.
pub fn find_label_font(explicit: Option<&Path>) -> Option<FontVec> {
    if let Some(path) = explicit {
        match load_font(path) {
            Ok(font) => return Some(font),
            Err(err) => log::warn!("{err:#}"),
        }
    }

    let found = FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .filter(|path| path.is_file())
        .find_map(|path| match load_font(&path) {
            Ok(font) => {
                log::debug!("label font: {}", path.display());
                Some(font)
            }
            Err(err) => {
                log::debug!("{err:#}");
                None
            }
        });

    if found.is_none() {
        log::warn!("no label font found; gesture labels will only be logged (use --font)");
    }
    found
}

/// The three windows of one frame.
pub struct Views {
    pub static_view: RgbImage,
    pub skin_view: GrayImage,
    pub dynamic_view: RgbImage,
}

impl Views {
    pub fn into_windows(self) -> [(&'static str, DynamicImage); 3] {
        [
            (STATIC_WINDOW, DynamicImage::ImageRgb8(self.static_view)),
            (SKIN_WINDOW, DynamicImage::ImageLuma8(self.skin_view)),
            (DYNAMIC_WINDOW, DynamicImage::ImageRgb8(self.dynamic_view)),
        ]
    }
}

pub struct Annotator {
    font: Option<FontVec>,
    box_mode: BoxMode,
}

impl Annotator {
    pub fn new(font: Option<FontVec>, box_mode: BoxMode) -> Self {
        Self { font, box_mode }
    }

    pub fn render(&self, frame: &Frame, analysis: &FrameAnalysis) -> Views {
        let mut static_view = frame.image.clone();
        let mut dynamic_view = frame.image.clone();
        let mut skin_view = analysis.mask.clone();

        if let Some(gesture) = analysis.gesture {
            // Fist goes on the static window, motion gestures on the dynamic one.
            let canvas = if gesture.is_dynamic() {
                &mut dynamic_view
            } else {
                &mut static_view
            };
            self.draw_label(canvas, gesture);
        }

        if let Some(rect) = analysis.bbox.and_then(|bbox| self.box_mode.rect(&bbox)) {
            draw_box(&mut skin_view, rect);
        }

        Views {
            static_view,
            skin_view,
            dynamic_view,
        }
    }

    fn draw_label(&self, canvas: &mut RgbImage, gesture: Gesture) {
        let Some(font) = &self.font else {
            return;
        };
        // The origin is the text baseline, so shift up by the glyph height.
        let (x, y) = LABEL_ORIGIN;
        draw_text_mut(
            canvas,
            LABEL_COLOR,
            x,
            y - LABEL_HEIGHT as i32,
            PxScale::from(LABEL_HEIGHT),
            font,
            gesture.label(),
        );
    }
}

/// Hollow rectangle, `BOX_THICKNESS` pixels wide, growing inward. Parts
/// outside the canvas are clipped.
pub fn draw_box(canvas: &mut GrayImage, rect: PixelRect) {
    for inset in 0..BOX_THICKNESS {
        let width = rect.width.saturating_sub(2 * inset);
        let height = rect.height.saturating_sub(2 * inset);
        if width == 0 || height == 0 {
            break;
        }
        let outline =
            Rect::at((rect.x + inset) as i32, (rect.y + inset) as i32).of_size(width, height);
        draw_hollow_rect_mut(canvas, outline, BOX_COLOR);
    }
}
