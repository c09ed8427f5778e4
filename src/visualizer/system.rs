//! Frame-driven visualizer bound to one analysis node.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::bars::draw_bars;
use super::Canvas;
use crate::audio::AnalyserNode;
use crate::params::VisualizerConfig;

/// Cancels a running visualizer; cloneable so teardown code can own one
#[derive(Debug, Clone)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            debug!("Visualizer stop requested");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Frequency bar visualizer
pub struct Visualizer {
    analyser: AnalyserNode,
    canvas: Canvas,

    /// Frequency frame, sized once at start and refreshed in place
    frame: Vec<u8>,

    config: VisualizerConfig,
    stopped: Arc<AtomicBool>,
    frames_drawn: u64,
}

impl Visualizer {
    /// Bind to an analysis node and size the canvas for the current viewport
    pub fn start(
        analyser: AnalyserNode,
        viewport_width: u32,
        config: VisualizerConfig,
    ) -> (Self, StopHandle) {
        let (width, height) = config.canvas_size(viewport_width);
        let bins = analyser.frequency_bin_count();
        info!("Visualizer: {}x{} canvas, {} bins", width, height, bins);

        let mut canvas = Canvas::new(width, height);
        canvas.clear(config.background);

        let stopped = Arc::new(AtomicBool::new(false));
        let handle = StopHandle {
            stopped: Arc::clone(&stopped),
        };

        let visualizer = Self {
            analyser,
            canvas,
            frame: vec![0; bins],
            config,
            stopped,
            frames_drawn: 0,
        };
        (visualizer, handle)
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
    }

    /// Redraw one frame. Returns false (without drawing) once stopped.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        self.canvas.clear(self.config.background);
        self.analyser.get_byte_frequency_data(&mut self.frame);
        draw_bars(&mut self.canvas, &self.frame, &self.config);

        self.frames_drawn += 1;
        true
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Most recent frequency frame
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::AnalyserConfig;
    use crate::visualizer::bar_for;
    use std::f32::consts::PI;

    fn node() -> AnalyserNode {
        AnalyserNode::new(AnalyserConfig::default()).unwrap()
    }

    #[test]
    fn test_start_sizes_canvas_from_viewport() {
        let (visualizer, _stop) = Visualizer::start(node(), 1000, VisualizerConfig::default());
        assert_eq!(visualizer.canvas().width(), 900);
        assert_eq!(visualizer.canvas().height(), 300);
    }

    #[test]
    fn test_frame_length_fixed_across_ticks() {
        let analyser = node();
        let input = analyser.input();
        let (mut visualizer, _stop) =
            Visualizer::start(analyser, 1280, VisualizerConfig::default());
        assert_eq!(visualizer.frame().len(), 128);

        for n in 0..5 {
            let tone: Vec<f32> = (0..256)
                .map(|i| (2.0 * PI * (4 + n) as f32 * i as f32 / 256.0).sin())
                .collect();
            input.push(&tone);
            assert!(visualizer.tick());
            assert_eq!(visualizer.frame().len(), 128);
        }
        assert_eq!(visualizer.frames_drawn(), 5);
    }

    #[test]
    fn test_tone_draws_bar() {
        let analyser = node();
        let tone: Vec<f32> = (0..256)
            .map(|i| (2.0 * PI * 2.0 * i as f32 / 256.0).sin())
            .collect();
        analyser.input().push(&tone);

        let config = VisualizerConfig::default();
        let background = config.background;
        let (mut visualizer, _stop) = Visualizer::start(analyser, 1280, config);
        visualizer.tick();

        // 22.5 px bars with a 1 px gap: bin 2 starts at x 47
        assert_eq!(visualizer.frame()[2], 255);
        let canvas = visualizer.canvas();
        assert_eq!(canvas.pixel(60, 299), bar_for(255).color);
        assert_eq!(canvas.pixel(60, 0), background);
    }

    #[test]
    fn test_stop_halts_ticks() {
        let (mut visualizer, stop) = Visualizer::start(node(), 800, VisualizerConfig::default());
        assert!(visualizer.tick());

        let teardown = stop.clone();
        teardown.stop();
        assert!(stop.is_stopped());
        assert!(!visualizer.is_running());
        assert!(!visualizer.tick());
        assert_eq!(visualizer.frames_drawn(), 1);
    }
}
