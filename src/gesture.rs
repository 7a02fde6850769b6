use crate::{
    types::{BoxMode, Direction, Frame, FrameAnalysis, Gesture},
    vision::{MotionHistory, circularity, clean_mask, projection::locate, skin_mask},
};

#[derive(Clone, Debug)]
pub struct GestureConfig {
    /// Circularity above which a static blob is a fist.
    pub circularity_threshold: f32,
    /// Centroid shift in pixels that counts as movement.
    pub motion_threshold: f64,
    /// Row/column foreground count that bounds the blob.
    pub projection_threshold: u32,
    pub box_mode: BoxMode,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            circularity_threshold: 0.65,
            motion_threshold: crate::vision::motion::MOTION_THRESHOLD,
            projection_threshold: crate::vision::projection::PROJECTION_THRESHOLD,
            box_mode: BoxMode::Corners,
        }
    }
}

/// Shape wins when the blob is still; otherwise the motion axis decides.
pub fn decide(circularity: f32, direction: Direction, cfg: &GestureConfig) -> Option<Gesture> {
    if circularity > cfg.circularity_threshold && direction == Direction::Static {
        return Some(Gesture::Fist);
    }
    match direction {
        Direction::Horizontal => Some(Gesture::WaveHand),
        Direction::Vertical => Some(Gesture::RaiseHand),
        Direction::Static => None,
    }
}

pub struct GestureAnalyzer {
    cfg: GestureConfig,
    history: Option<MotionHistory>,
}

impl GestureAnalyzer {
    pub fn new(cfg: GestureConfig) -> Self {
        Self { cfg, history: None }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.cfg
    }

    #[cfg(test)]
    pub fn history(&self) -> Option<&MotionHistory> {
        self.history.as_ref()
    }

    pub fn analyze(&mut self, frame: &Frame) -> FrameAnalysis {
        let mut mask = skin_mask(&frame.image);
        clean_mask(&mut mask);

        let motion_threshold = self.cfg.motion_threshold;
        let history = self.history_for(frame.width(), frame.height());
        history.push(mask);
        // Both slots are re-cleaned every frame, so the newest mask is opened twice.
        history.clean_all();

        let direction = history.direction(motion_threshold);
        let mask = history.current().clone();
        let circularity = circularity(&mask);
        let gesture = decide(circularity, direction, &self.cfg);
        let bbox = gesture.map(|_| locate(&mask, self.cfg.projection_threshold));

        log::debug!(
            "frame {}: circularity {:.3}, direction {} ({})",
            frame.sequence,
            circularity,
            direction.label(),
            direction.code()
        );

        FrameAnalysis {
            circularity,
            direction,
            gesture,
            bbox,
            mask,
        }
    }

    fn history_for(&mut self, width: u32, height: u32) -> &mut MotionHistory {
        let history = self
            .history
            .get_or_insert_with(|| MotionHistory::new(width, height));
        if history.dimensions() != (width, height) {
            log::warn!("frame size changed to {width}x{height}, resetting motion history");
            *history = MotionHistory::new(width, height);
        }
        history
    }
}
