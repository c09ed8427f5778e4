//! Frequency bar visualizer drawn onto a CPU canvas.

mod bars;
mod canvas;
mod system;

// Re-export public types
pub use bars::{bar_for, bar_width, draw_bars, Bar};
pub use canvas::Canvas;
pub use system::{StopHandle, Visualizer};
