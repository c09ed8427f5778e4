//! moodplayer library - playback control and frequency visualization for generated tracks

pub mod audio;
pub mod cli;
pub mod error;
pub mod logging;
pub mod params;
pub mod player;
pub mod rendering;
pub mod source;
pub mod visualizer;
