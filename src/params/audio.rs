//! Audio analysis configuration.

use crate::error::TapError;

/// Smallest FFT size accepted by the analyser
pub const MIN_FFT_SIZE: usize = 32;

/// Largest FFT size accepted by the analyser
pub const MAX_FFT_SIZE: usize = 32768;

/// Frequency analysis configuration (mirrors the Web Audio analyser defaults
/// except for the FFT size, which is kept small for chunky bars)
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size (must be power of 2)
    /// 256 = 128 frequency bins
    pub fft_size: usize,

    /// Exponential smoothing between successive frames (0.0 = none, <1.0)
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins produced per frame
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), TapError> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(TapError::InvalidFftSize(self.fft_size));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(TapError::InvalidConfig(format!(
                "smoothing time constant must be in [0, 1), got {}",
                self.smoothing_time_constant
            )));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(TapError::InvalidConfig(format!(
                "decibel range is empty: {}..{}",
                self.min_decibels, self.max_decibels
            )));
        }
        Ok(())
    }
}
