//! Magnitude-to-bar mapping and bar layout.

use super::Canvas;
use crate::params::VisualizerConfig;

/// One frequency bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Height in pixels (half the magnitude byte)
    pub height: f32,
    /// RGBA; blue ramps with magnitude over a fixed red/green tint
    pub color: [u8; 4],
}

/// Pure mapping from a magnitude byte to its bar
pub fn bar_for(magnitude: u8) -> Bar {
    Bar {
        height: magnitude as f32 / 2.0,
        color: [100, 50, (magnitude as u16 + 100).min(255) as u8, 255],
    }
}

/// Bar width for a canvas and bin count
pub fn bar_width(canvas_width: u32, bin_count: usize, scale: f32) -> f32 {
    if bin_count == 0 {
        return 0.0;
    }
    canvas_width as f32 / bin_count as f32 * scale
}

/// Paint one frame of bars, left to right, anchored to the bottom edge
pub fn draw_bars(canvas: &mut Canvas, frame: &[u8], config: &VisualizerConfig) {
    let width = bar_width(canvas.width(), frame.len(), config.bar_width_scale);
    let bottom = canvas.height() as f32;
    let mut x = 0.0;

    for &magnitude in frame {
        if x >= canvas.width() as f32 {
            break;
        }
        let bar = bar_for(magnitude);
        canvas.fill_rect(x, bottom - bar.height, width, bar.height, bar.color);
        x += width + config.bar_gap_px;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_for_silence() {
        let bar = bar_for(0);
        assert_eq!(bar.height, 0.0);
        assert_eq!(bar.color, [100, 50, 100, 255]);
    }

    #[test]
    fn test_bar_for_full_scale() {
        let bar = bar_for(255);
        assert_eq!(bar.height, 127.5);
        assert_eq!(bar.color, [100, 50, 255, 255]);
    }

    #[test]
    fn test_bar_color_linear_until_clamp() {
        assert_eq!(bar_for(100).color[2], 200);
        assert_eq!(bar_for(155).color[2], 255);
        assert_eq!(bar_for(156).color[2], 255);
        for m in 0..=255u8 {
            assert_eq!(bar_for(m).height * 2.0, m as f32);
        }
    }

    #[test]
    fn test_bar_width_scales_with_bins() {
        assert_eq!(bar_width(1280, 128, 2.5), 25.0);
        assert_eq!(bar_width(900, 128, 2.5), 900.0 / 128.0 * 2.5);
        assert_eq!(bar_width(900, 0, 2.5), 0.0);
    }

    #[test]
    fn test_draw_bars_layout() {
        let config = VisualizerConfig::default();
        let mut canvas = Canvas::new(100, 300);
        canvas.clear(config.background);

        // 10 bins on 100 px: 25 px bars with a 1 px gap
        let mut frame = vec![0u8; 10];
        frame[0] = 200;
        frame[1] = 100;
        draw_bars(&mut canvas, &frame, &config);

        let first = bar_for(200).color;
        let second = bar_for(100).color;

        // First bar: x 0..25, top at 300 - 100
        assert_eq!(canvas.pixel(0, 299), first);
        assert_eq!(canvas.pixel(24, 200), first);
        assert_eq!(canvas.pixel(24, 199), config.background);

        // Gap at x 25, second bar from x 26, 50 px tall
        assert_eq!(canvas.pixel(25, 299), config.background);
        assert_eq!(canvas.pixel(26, 250), second);
        assert_eq!(canvas.pixel(26, 249), config.background);
    }
}
