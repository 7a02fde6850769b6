use anyhow::{Context, Result};
use crossbeam_channel::Receiver;

use crate::{
    config::LoopOptions,
    display::DisplaySurface,
    gesture::GestureAnalyzer,
    keys::{Key, wait_key},
    overlay::Annotator,
    pipeline::{CaptureError, FrameSource},
    types::Gesture,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    CancelKey,
    ReadFailed,
    EndOfStream,
    FrameLimit,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub fists: u64,
    pub waves: u64,
    pub raises: u64,
}

impl RunSummary {
    fn record(&mut self, gesture: Option<Gesture>) {
        self.frames += 1;
        match gesture {
            Some(Gesture::Fist) => self.fists += 1,
            Some(Gesture::WaveHand) => self.waves += 1,
            Some(Gesture::RaiseHand) => self.raises += 1,
            None => {}
        }
    }
}

pub struct FrameLoop<'a, S: ?Sized, D: ?Sized> {
    pub source: &'a mut S,
    pub display: &'a mut D,
    pub analyzer: GestureAnalyzer,
    pub annotator: Annotator,
    pub keys: Receiver<Key>,
    pub options: LoopOptions,
}

impl<S, D> FrameLoop<'_, S, D>
where
    S: FrameSource + ?Sized,
    D: DisplaySurface + ?Sized,
{
    /// Runs until a cancel key, a failed read, the end of the stream or the
    /// frame limit. Undecodable frames are skipped but still count as reads.
    pub fn run(mut self) -> Result<(ExitReason, RunSummary)> {
        let mut summary = RunSummary::default();
        let mut last_gesture = None;
        let mut reads: u64 = 0;

        let reason = loop {
            if self
                .options
                .max_frames
                .is_some_and(|limit| reads >= limit)
            {
                break ExitReason::FrameLimit;
            }

            let frame = match self.source.read() {
                Ok(Some(frame)) => Some(frame),
                Ok(None) => {
                    log::info!("{} has no more frames", self.source.describe());
                    break ExitReason::EndOfStream;
                }
                Err(CaptureError::Decode(reason)) => {
                    log::warn!("skipping undecodable frame: {reason}");
                    None
                }
                Err(err) => {
                    log::error!("{err}");
                    break ExitReason::ReadFailed;
                }
            };
            reads += 1;

            if let Some(frame) = frame {
                let analysis = self.analyzer.analyze(&frame);
                if analysis.gesture != last_gesture {
                    match analysis.gesture {
                        Some(gesture) => log::info!(
                            "frame {}: {} (circularity {:.2}, {})",
                            frame.sequence,
                            gesture.label(),
                            analysis.circularity,
                            analysis.direction.label()
                        ),
                        None => log::info!("frame {}: no gesture", frame.sequence),
                    }
                    last_gesture = analysis.gesture;
                }
                summary.record(analysis.gesture);

                for (window, image) in self.annotator.render(&frame, &analysis).into_windows() {
                    self.display
                        .show(window, &image)
                        .with_context(|| format!("failed to show frame {}", frame.sequence))?;
                }
                log::debug!(
                    "frame {} done {:?} after capture",
                    frame.sequence,
                    frame.timestamp.elapsed()
                );
            }

            // Skipped frames still reach the key check.
            if let Some(key) = wait_key(&self.keys, self.options.key_wait) {
                if key.is_cancel() {
                    log::info!("cancel key pressed by user");
                    break ExitReason::CancelKey;
                }
            }
        };

        log::info!(
            "stopped after {} frames ({:?}): {} fist, {} wave, {} raise",
            summary.frames,
            reason,
            summary.fists,
            summary.waves,
            summary.raises
        );
        Ok((reason, summary))
    }
}
