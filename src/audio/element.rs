//! Media element abstraction driven by the playback controller.

use crate::audio::TapInput;
use crate::error::Result;
use crate::source::TrackSource;

/// Lifecycle notifications raised by a media element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// The play head moved
    TimeUpdate,
    /// Playback reached the end of the track
    Ended,
}

/// A single playable track with transport controls
pub trait MediaElement {
    fn source(&self) -> &TrackSource;

    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn paused(&self) -> bool;

    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);

    /// Play head position (seconds)
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);

    /// Track length in seconds; `None` until known
    fn duration(&self) -> Option<f64>;

    /// Route every sample sent to the output device into `input` as well
    fn connect_tap(&mut self, input: TapInput);

    /// Drain events raised since the previous poll
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}
