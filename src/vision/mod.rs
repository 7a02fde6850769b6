pub mod moments;
pub mod morphology;
pub mod motion;
pub mod projection;
pub mod skin;

// Re-exports for convenience
pub use moments::circularity;
pub use morphology::clean_mask;
pub use motion::MotionHistory;
pub use skin::skin_mask;
