//! Playback controller.
//!
//! Mediates every interaction with the media element and lazily builds the
//! audio tap the first time playback starts.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::audio::{AnalyserNode, AudioTap, MediaElement, MediaEvent, TapFactory};
use crate::error::{PlayerError, Result};
use crate::params::PlayerConfig;

/// Observable playback state
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// 0.0 - 1.0
    pub volume: f32,
    /// Percent of track, 0.0 - 100.0
    pub progress: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            volume: 1.0,
            progress: 0.0,
        }
    }
}

/// Lifecycle of the analysis tap
enum TapState {
    Untapped,
    Tapped(AudioTap),
    /// Construction failed; playback continues without analysis
    Unavailable,
}

/// Public view of [`TapState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapStatus {
    Untapped,
    Tapped,
    Unavailable,
}

/// Controller owning one media element and its tap
pub struct PlaybackController<E: MediaElement, F: TapFactory<E>> {
    element: Option<E>,
    factory: F,
    tap: TapState,
    state: PlaybackState,
    config: PlayerConfig,
}

impl<E: MediaElement, F: TapFactory<E>> PlaybackController<E, F> {
    /// Create a controller for a track, applying the initial volume
    pub fn new(element: E, factory: F, config: PlayerConfig) -> Self {
        let mut controller = Self::empty(factory, config);
        controller.replace_source(element);
        controller
    }

    /// Create a controller with no track; every action is ignored until
    /// [`replace_source`](Self::replace_source) supplies one
    pub fn inert(factory: F, config: PlayerConfig) -> Self {
        warn!("No track source available; player stays inert until one is supplied");
        Self::empty(factory, config)
    }

    fn empty(factory: F, config: PlayerConfig) -> Self {
        Self {
            element: None,
            factory,
            tap: TapState::Untapped,
            state: PlaybackState {
                volume: config.initial_volume,
                ..Default::default()
            },
            config,
        }
    }

    /// Swap in a new track. The previous element and its tap are dropped.
    pub fn replace_source(&mut self, mut element: E) {
        info!("Track source: {}", element.source().path().display());
        element.set_volume(self.config.initial_volume);
        self.element = Some(element);
        self.tap = TapState::Untapped;
        self.state = PlaybackState {
            volume: self.config.initial_volume,
            ..Default::default()
        };
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    pub fn is_inert(&self) -> bool {
        self.element.is_none()
    }

    pub fn tap_status(&self) -> TapStatus {
        match self.tap {
            TapState::Untapped => TapStatus::Untapped,
            TapState::Tapped(_) => TapStatus::Tapped,
            TapState::Unavailable => TapStatus::Unavailable,
        }
    }

    /// Analysis node of the current tap, if one was built
    pub fn analyser(&self) -> Option<&AnalyserNode> {
        match &self.tap {
            TapState::Tapped(tap) => Some(tap.analyser()),
            _ => None,
        }
    }

    /// Flip play/pause.
    ///
    /// The first call builds the audio tap. Returns the analysis node only
    /// on that call, so the caller can start the visualizer exactly once.
    pub fn toggle_play_pause(&mut self) -> Option<AnalyserNode> {
        let Some(element) = self.element.as_mut() else {
            debug!("Toggle ignored: no track source");
            return None;
        };

        let mut tapped = None;
        if let TapState::Untapped = self.tap {
            self.tap = match self.factory.build(element) {
                Ok(tap) => {
                    tapped = Some(tap.analyser().clone());
                    TapState::Tapped(tap)
                }
                Err(e) => {
                    warn!("Visualization unavailable, audio still plays: {}", e);
                    TapState::Unavailable
                }
            };
        }

        if element.paused() {
            if let Err(e) = element.play() {
                error!("Playback failed to start: {}", e);
            }
        } else {
            element.pause();
        }
        self.state.is_playing = !element.paused();
        debug!("Playing: {}", self.state.is_playing);

        tapped
    }

    /// Set volume (0.0 - 1.0); applied to the element immediately
    pub fn set_volume(&mut self, volume: f32) {
        let Some(element) = self.element.as_mut() else {
            return;
        };
        element.set_volume(volume);
        self.state.volume = volume;
    }

    /// Seek to a percentage (0 - 100) of the track.
    ///
    /// Ignored while the duration is unknown or zero.
    pub fn seek(&mut self, percent: f64) {
        let Some(element) = self.element.as_mut() else {
            return;
        };
        let Some(duration) = known_duration(element) else {
            debug!("Seek to {}% ignored: duration unknown", percent);
            return;
        };
        element.set_current_time(percent / 100.0 * duration);
        self.state.progress = percent;
    }

    /// Recompute progress from the element's play head
    pub fn on_time_update(&mut self) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        if let Some(duration) = known_duration(element) {
            self.state.progress = element.current_time() / duration * 100.0;
        }
    }

    pub fn on_ended(&mut self) {
        self.state.is_playing = false;
    }

    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate => self.on_time_update(),
            MediaEvent::Ended => self.on_ended(),
        }
    }

    /// Deliver pending element events
    pub fn poll(&mut self) {
        let events = match self.element.as_mut() {
            Some(element) => element.poll_events(),
            None => return,
        };
        for event in events {
            self.handle_event(event);
        }
    }

    /// Copy the raw track into `dest_dir` under the configured file name
    pub fn download(&self, dest_dir: &Path) -> Result<PathBuf> {
        let element = self.element.as_ref().ok_or(PlayerError::NoSource)?;
        fs::create_dir_all(dest_dir)?;
        let target = dest_dir.join(&self.config.download_filename);
        fs::copy(element.source().path(), &target)?;
        info!("Downloaded track to {}", target.display());
        Ok(target)
    }
}

fn known_duration<E: MediaElement>(element: &E) -> Option<f64> {
    element.duration().filter(|d| d.is_finite() && *d > 0.0)
}
