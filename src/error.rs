//! Error types for playback, analysis and track hand-off.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the player and its collaborators
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to decode track {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("unsupported sample format: {bits}-bit {format:?}")]
    UnsupportedFormat {
        bits: u16,
        format: hound::SampleFormat,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("track store error: {0}")]
    Store(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no track source available")]
    NoSource,
}

/// Errors raised while constructing the audio tap
#[derive(Debug, Error)]
pub enum TapError {
    #[error("audio analysis is unavailable: {0}")]
    Unavailable(String),

    #[error("FFT size must be a power of two between 32 and 32768, got {0}")]
    InvalidFftSize(usize),

    #[error("invalid analyser configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
