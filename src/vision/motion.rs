use image::GrayImage;

use super::{moments::Moments, morphology::clean_mask};
use crate::types::{Direction, SkinMask};

/// Centroid displacement (pixels) that counts as movement.
pub const MOTION_THRESHOLD: f64 = 30.0;

pub fn direction(previous: &SkinMask, current: &SkinMask, threshold: f64) -> Direction {
    let (x1, y1) = Moments::of_mask(previous).centroid();
    let (x2, y2) = Moments::of_mask(current).centroid();
    classify_shift(x2 - x1, y2 - y1, threshold)
}

/// NaN shifts (from empty masks) fail every comparison and come out static.
pub fn classify_shift(dx: f64, dy: f64, threshold: f64) -> Direction {
    let (abs_x, abs_y) = (dx.abs(), dy.abs());
    if abs_x > threshold || abs_y > threshold {
        if abs_x > abs_y {
            Direction::Horizontal
        } else {
            Direction::Vertical
        }
    } else {
        Direction::Static
    }
}

/// Two-slot FIFO of the most recent masks.
#[derive(Clone, Debug)]
pub struct MotionHistory {
    slots: [SkinMask; 2],
    // Index of the oldest slot.
    head: usize,
}

impl MotionHistory {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            slots: [GrayImage::new(width, height), GrayImage::new(width, height)],
            head: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.current().dimensions()
    }

    /// Stores `mask` as the current entry and returns the evicted oldest one.
    pub fn push(&mut self, mask: SkinMask) -> SkinMask {
        let evicted = std::mem::replace(&mut self.slots[self.head], mask);
        self.head = (self.head + 1) % self.slots.len();
        evicted
    }

    pub fn previous(&self) -> &SkinMask {
        &self.slots[self.head]
    }

    pub fn current(&self) -> &SkinMask {
        &self.slots[(self.head + 1) % self.slots.len()]
    }

    pub fn clean_all(&mut self) {
        for slot in self.slots.iter_mut() {
            clean_mask(slot);
        }
    }

    pub fn direction(&self, threshold: f64) -> Direction {
        direction(self.previous(), self.current(), threshold)
    }
}
