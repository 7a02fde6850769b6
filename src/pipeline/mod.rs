#[cfg(feature = "camera-nokhwa")]
pub mod camera;
pub mod rgb_converter;
pub mod source;

// Re-exports for convenience
#[cfg(feature = "camera-nokhwa")]
pub use camera::{CameraCapture, available_cameras};
pub use source::{CaptureError, FrameSource, ImageSequence};
