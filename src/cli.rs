//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::error::{PlayerError, Result};
use crate::params::{AnalyserConfig, PlayerConfig, SnapshotConfig, VisualizerConfig, WindowConfig};
use crate::source::{TrackSource, TrackStore};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "moodplayer")]
#[command(about = "Player and frequency visualizer for generated tracks", long_about = None)]
pub struct Args {
    /// WAV track to play; also recorded in the track store
    #[arg(value_name = "TRACK")]
    pub track: Option<PathBuf>,

    /// Track store handed over by the generation flow
    #[arg(long, value_name = "PATH", default_value = "moodplayer-track.json")]
    pub store: PathBuf,

    /// Directory the download action writes into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub download_dir: PathBuf,

    /// Directory for canvas snapshots
    #[arg(long, value_name = "DIR", default_value = "snapshots")]
    pub snapshot_dir: PathBuf,

    /// Viewport width used to size the canvas (pixels)
    #[arg(long, value_name = "PX", default_value = "1280")]
    pub viewport_width: u32,

    /// Analyser FFT size (power of 2; bins = half)
    #[arg(long, value_name = "N", default_value = "256")]
    pub fft_size: usize,

    /// Initial volume (0.0 - 1.0)
    #[arg(long, value_name = "LEVEL", default_value = "1.0")]
    pub volume: f32,

    /// Log filter when RUST_LOG is unset
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_filter: String,
}

impl Args {
    /// Resolve the track to play.
    ///
    /// An explicit track replaces the stored one; otherwise the stored
    /// track (if any) is used.
    pub fn resolve_source(&self) -> Result<Option<TrackSource>> {
        let mut store = TrackStore::load(&self.store)?;
        if let Some(track) = &self.track {
            store.set(TrackSource::new(track));
            store.save(&self.store)?;
        }
        Ok(store.current().cloned())
    }

    pub fn analyser_config(&self) -> Result<AnalyserConfig> {
        let config = AnalyserConfig {
            fft_size: self.fft_size,
            ..Default::default()
        };
        config
            .validate()
            .map_err(|e| PlayerError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    pub fn player_config(&self) -> Result<PlayerConfig> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(PlayerError::InvalidConfig(format!(
                "volume must be in [0, 1], got {}",
                self.volume
            )));
        }
        Ok(PlayerConfig {
            initial_volume: self.volume,
            download_dir: self.download_dir.clone(),
            ..Default::default()
        })
    }

    /// Window configuration; the canvas must fit in a single GPU texture
    pub fn window_config(&self) -> Result<WindowConfig> {
        let max_width = wgpu::Limits::default().max_texture_dimension_2d;
        let (canvas_width, _) = self.visualizer_config().canvas_size(self.viewport_width);
        if canvas_width > max_width {
            return Err(PlayerError::InvalidConfig(format!(
                "viewport width {} gives a {} px canvas, wider than the {} px texture limit",
                self.viewport_width, canvas_width, max_width
            )));
        }
        Ok(WindowConfig {
            viewport_width: self.viewport_width,
            ..Default::default()
        })
    }

    pub fn visualizer_config(&self) -> VisualizerConfig {
        VisualizerConfig::default()
    }

    pub fn snapshot_config(&self) -> SnapshotConfig {
        SnapshotConfig::new(&self.snapshot_dir)
    }
}
