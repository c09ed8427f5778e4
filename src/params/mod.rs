//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, percent, dBFS)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod player;
mod render;

// Re-export all types
pub use audio::{AnalyserConfig, MAX_FFT_SIZE, MIN_FFT_SIZE};
pub use player::PlayerConfig;
pub use render::{SnapshotConfig, VisualizerConfig, WindowConfig};
