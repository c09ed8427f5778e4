//! CPU-side RGBA drawing surface.

use std::path::Path;

/// RGBA8 framebuffer with the handful of operations the visualizer needs
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major from the top-left corner
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Paint every pixel with `color`
    pub fn clear(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Fill a rectangle; edges snap to the nearest pixel and the result is
    /// clipped to the canvas
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [u8; 4]) {
        let x0 = snap(x, self.width);
        let x1 = snap(x + width, self.width);
        let y0 = snap(y, self.height);
        let y1 = snap(y + height, self.height);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        for row in y0..y1 {
            let start = ((row * self.width + x0) * 4) as usize;
            let end = ((row * self.width + x1) * 4) as usize;
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
    }

    /// Save as PNG
    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
    }
}

fn snap(coord: f32, limit: u32) -> u32 {
    if coord.is_nan() {
        return 0;
    }
    coord.round().clamp(0.0, limit as f32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn test_clear_paints_everything() {
        let mut canvas = Canvas::new(4, 3);
        canvas.clear(BLACK);
        assert!(canvas.pixels().chunks(4).all(|px| px == BLACK));
    }

    #[test]
    fn test_fill_rect_covers_exact_pixels() {
        let mut canvas = Canvas::new(10, 10);
        canvas.clear(BLACK);
        canvas.fill_rect(2.0, 3.0, 2.0, 4.0, RED);

        assert_eq!(canvas.pixel(2, 3), RED);
        assert_eq!(canvas.pixel(3, 6), RED);
        assert_eq!(canvas.pixel(4, 3), BLACK);
        assert_eq!(canvas.pixel(2, 7), BLACK);
        assert_eq!(canvas.pixel(1, 3), BLACK);
    }

    #[test]
    fn test_fill_rect_clips_to_canvas() {
        let mut canvas = Canvas::new(5, 5);
        canvas.clear(BLACK);
        canvas.fill_rect(3.0, -2.0, 10.0, 4.0, RED);

        assert_eq!(canvas.pixel(4, 0), RED);
        assert_eq!(canvas.pixel(4, 1), RED);
        assert_eq!(canvas.pixel(4, 2), BLACK);
    }

    #[test]
    fn test_zero_height_rect_draws_nothing() {
        let mut canvas = Canvas::new(5, 5);
        canvas.clear(BLACK);
        canvas.fill_rect(0.0, 5.0, 5.0, 0.0, RED);
        assert!(canvas.pixels().chunks(4).all(|px| px == BLACK));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = Canvas::new(8, 4);
        canvas.clear(RED);
        canvas.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (8, 4));
        assert_eq!(loaded.get_pixel(0, 0).0, RED);
    }
}
