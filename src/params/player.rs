//! Playback control configuration.

use std::path::PathBuf;

/// Playback controller configuration
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Initial volume (0.0 - 1.0)
    pub initial_volume: f32,

    /// Volume change per key press (matches the 0.1 slider step)
    pub volume_step: f32,

    /// Seek change per key press (percent of track)
    pub seek_step_percent: f64,

    /// File name offered by the download action
    pub download_filename: String,

    /// Directory the download action writes into
    pub download_dir: PathBuf,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            volume_step: 0.1,
            seek_step_percent: 5.0,
            download_filename: "generated_music.wav".to_string(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl PlayerConfig {
    /// Step a volume up or down, staying inside [0, 1]
    pub fn step_volume(&self, volume: f32, up: bool) -> f32 {
        let delta = if up { self.volume_step } else { -self.volume_step };
        // Snap to the slider's 0.1 grid so repeated steps land on 0 and 1 exactly
        ((volume + delta).clamp(0.0, 1.0) * 10.0).round() / 10.0
    }

    /// Step a seek position up or down, staying inside [0, 100]
    pub fn step_seek(&self, percent: f64, forward: bool) -> f64 {
        let delta = if forward {
            self.seek_step_percent
        } else {
            -self.seek_step_percent
        };
        (percent + delta).clamp(0.0, 100.0)
    }
}
