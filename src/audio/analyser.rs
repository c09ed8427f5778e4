//! Frequency analysis node.
//!
//! Keeps a sliding window of the most recent output samples and turns it
//! into byte magnitudes the way a Web Audio analyser does: Blackman window,
//! FFT, per-bin smoothing, then dB scaled onto 0-255.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::error::TapError;
use crate::params::AnalyserConfig;

/// Analysis state shared between the audio callback and the renderer
pub struct Analyser {
    fft: Arc<dyn Fft<f32>>,
    config: AnalyserConfig,

    /// Ring buffer holding the last `fft_size` mono samples
    input: Vec<f32>,
    write_pos: usize,

    window: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,

    /// Smoothed linear magnitudes from the previous frame
    smoothed: Vec<f32>,
}

impl Analyser {
    pub fn new(config: AnalyserConfig) -> Result<Self, TapError> {
        config.validate()?;

        let fft_size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch_len = fft.get_inplace_scratch_len();

        let window = (0..fft_size).map(|i| blackman_window(i, fft_size)).collect();

        debug!(
            "Analyser created: fft_size={}, bins={}, smoothing={}",
            fft_size,
            config.frequency_bin_count(),
            config.smoothing_time_constant
        );

        Ok(Self {
            fft,
            input: vec![0.0; fft_size],
            write_pos: 0,
            window,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            smoothed: vec![0.0; config.frequency_bin_count()],
            config,
        })
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.config.frequency_bin_count()
    }

    /// Append mono samples, overwriting the oldest
    pub fn push_samples(&mut self, samples: &[f32]) {
        let size = self.input.len();
        for &sample in samples {
            self.input[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % size;
        }
    }

    /// Compute the current spectrum into `out` (one byte per bin).
    ///
    /// Writes at most `min(out.len(), bin_count)` values.
    pub fn get_byte_frequency_data(&mut self, out: &mut [u8]) {
        let size = self.config.fft_size;

        // Oldest sample first
        for i in 0..size {
            let sample = self.input[(self.write_pos + i) % size];
            self.fft_buffer[i] = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.fft_buffer, &mut self.scratch);

        let tau = self.config.smoothing_time_constant;
        let min_db = self.config.min_decibels;
        let range_db = self.config.max_decibels - min_db;

        for (bin, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.fft_buffer[bin].norm() / size as f32;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;

            if let Some(slot) = out.get_mut(bin) {
                *slot = magnitude_to_byte(*smoothed, min_db, range_db);
            }
        }
    }
}

/// Map a linear magnitude onto 0-255 across the configured dB range
fn magnitude_to_byte(magnitude: f32, min_db: f32, range_db: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = 255.0 * (db - min_db) / range_db;
    scaled.clamp(0.0, 255.0).floor() as u8
}

/// Blackman window function for FFT analysis
pub fn blackman_window(index: usize, size: usize) -> f32 {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    let phase = 2.0 * PI * index as f32 / size as f32;
    A0 - A1 * phase.cos() + A2 * (2.0 * phase).cos()
}

/// Cloneable handle to an analyser; the renderer's read side
#[derive(Clone)]
pub struct AnalyserNode {
    inner: Arc<Mutex<Analyser>>,
    bin_count: usize,
}

impl AnalyserNode {
    pub fn new(config: AnalyserConfig) -> Result<Self, TapError> {
        let analyser = Analyser::new(config)?;
        let bin_count = analyser.frequency_bin_count();
        Ok(Self {
            inner: Arc::new(Mutex::new(analyser)),
            bin_count,
        })
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn get_byte_frequency_data(&self, out: &mut [u8]) {
        lock(&self.inner).get_byte_frequency_data(out);
    }

    /// Handle the media element uses to feed its output into this node
    pub fn input(&self) -> TapInput {
        TapInput {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Write side of an analyser, held by the media element's output path
#[derive(Clone)]
pub struct TapInput {
    inner: Arc<Mutex<Analyser>>,
}

impl TapInput {
    pub fn push(&self, samples: &[f32]) {
        lock(&self.inner).push_samples(samples);
    }
}

// A panic on the audio thread must not take the renderer down with it
fn lock(inner: &Mutex<Analyser>) -> MutexGuard<'_, Analyser> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bin: usize, fft_size: usize, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * bin as f32 * i as f32 / fft_size as f32).sin())
            .collect()
    }

    #[test]
    fn test_blackman_window() {
        let size = 256;

        // Blackman window should be ~0 at edges, 1 at center
        assert!(blackman_window(0, size).abs() < 0.001);
        assert!((blackman_window(size / 2, size) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_silence_is_all_zero() {
        let node = AnalyserNode::new(AnalyserConfig::default()).unwrap();
        node.input().push(&vec![0.0; 512]);

        let mut frame = vec![255u8; node.frequency_bin_count()];
        node.get_byte_frequency_data(&mut frame);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_lights_up_its_bin() {
        let config = AnalyserConfig::default();
        let fft_size = config.fft_size;
        let node = AnalyserNode::new(config).unwrap();
        node.input().push(&sine(10, fft_size, fft_size));

        let mut frame = vec![0u8; node.frequency_bin_count()];
        node.get_byte_frequency_data(&mut frame);

        assert_eq!(frame[10], 255);
        assert!(frame[100] < frame[10]);
    }

    #[test]
    fn test_smoothing_decays_after_tone_stops() {
        let config = AnalyserConfig::default();
        let fft_size = config.fft_size;
        let node = AnalyserNode::new(config).unwrap();
        let input = node.input();
        input.push(&sine(20, fft_size, fft_size));

        let mut frame = vec![0u8; node.frequency_bin_count()];
        node.get_byte_frequency_data(&mut frame);
        let mut previous = frame[20];

        input.push(&vec![0.0; fft_size]);
        for _ in 0..10 {
            node.get_byte_frequency_data(&mut frame);
            assert!(frame[20] <= previous);
            previous = frame[20];
        }
        assert!(previous < 255);
    }

    #[test]
    fn test_short_output_buffer_is_filled_partially() {
        let node = AnalyserNode::new(AnalyserConfig::default()).unwrap();
        let mut frame = vec![7u8; 4];
        node.get_byte_frequency_data(&mut frame);
        assert_eq!(frame, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_magnitude_to_byte_bounds() {
        assert_eq!(magnitude_to_byte(0.0, -100.0, 70.0), 0);
        assert_eq!(magnitude_to_byte(1.0, -100.0, 70.0), 255);
        // -65 dB sits halfway through -100..-30
        let half = 10f32.powf(-65.0 / 20.0);
        assert_eq!(magnitude_to_byte(half, -100.0, 70.0), 127);
    }
}
