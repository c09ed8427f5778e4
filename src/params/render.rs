//! Visualizer and snapshot configuration.

use std::path::PathBuf;

/// Frequency bar visualizer configuration
#[derive(Debug, Clone)]
pub struct VisualizerConfig {
    /// Canvas height (pixels), fixed regardless of viewport
    pub canvas_height_px: u32,

    /// Canvas width as a fraction of the viewport width at start time
    pub viewport_fraction: f32,

    /// Bar width multiplier applied to `canvas_width / bin_count`
    pub bar_width_scale: f32,

    /// Horizontal gap between bars (pixels)
    pub bar_gap_px: f32,

    /// Background colour painted on every clear (RGBA)
    pub background: [u8; 4],
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            canvas_height_px: 300,
            viewport_fraction: 0.9,
            bar_width_scale: 2.5,
            bar_gap_px: 1.0,
            background: [0, 0, 0, 255],
        }
    }
}

impl VisualizerConfig {
    /// Canvas size (width, height) for a viewport of the given width
    pub fn canvas_size(&self, viewport_width: u32) -> (u32, u32) {
        let width = (viewport_width as f32 * self.viewport_fraction).floor() as u32;
        (width.max(1), self.canvas_height_px)
    }
}

/// Window configuration for the desktop front-end
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Logical viewport width used to size the canvas (pixels)
    pub viewport_width: u32,

    /// Window title
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            title: "moodplayer".to_string(),
        }
    }
}

/// Canvas snapshot configuration
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Output directory for saved frames
    pub output_dir: PathBuf,
}

impl SnapshotConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Frame file path
    pub fn frame_path(&self, frame_num: usize) -> PathBuf {
        self.output_dir.join(format!("frame_{:05}.png", frame_num))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size_follows_viewport() {
        let config = VisualizerConfig::default();
        assert_eq!(config.canvas_size(1000), (900, 300));
        assert_eq!(config.canvas_size(1280), (1152, 300));
    }

    #[test]
    fn test_canvas_size_never_zero() {
        let config = VisualizerConfig::default();
        assert_eq!(config.canvas_size(0), (1, 300));
    }

    #[test]
    fn test_snapshot_frame_path() {
        let config = SnapshotConfig::new("shots");
        assert_eq!(
            config.frame_path(7),
            PathBuf::from("shots").join("frame_00007.png")
        );
    }
}
