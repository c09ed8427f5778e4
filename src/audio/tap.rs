//! One-time wiring of a media element's output into an analyser.

use tracing::debug;

use super::element::MediaElement;
use super::AnalyserNode;
use crate::error::TapError;
use crate::params::AnalyserConfig;

/// Analysis tap bound to a single media element.
///
/// Element output keeps flowing to the device; the analyser sees a copy.
pub struct AudioTap {
    analyser: AnalyserNode,
}

impl AudioTap {
    pub fn analyser(&self) -> &AnalyserNode {
        &self.analyser
    }
}

/// Builds audio taps; the platform analysis capability
pub trait TapFactory<E: MediaElement> {
    fn build(&mut self, element: &mut E) -> Result<AudioTap, TapError>;
}

/// Factory wiring elements to an FFT analyser
#[derive(Debug, Clone, Default)]
pub struct AnalyserTapFactory {
    config: AnalyserConfig,
}

impl AnalyserTapFactory {
    pub fn new(config: AnalyserConfig) -> Self {
        Self { config }
    }
}

impl<E: MediaElement> TapFactory<E> for AnalyserTapFactory {
    fn build(&mut self, element: &mut E) -> Result<AudioTap, TapError> {
        let analyser = AnalyserNode::new(self.config.clone())?;
        element.connect_tap(analyser.input());
        debug!(
            "Audio tap connected to {} ({} bins)",
            element.source().path().display(),
            analyser.frequency_bin_count()
        );
        Ok(AudioTap { analyser })
    }
}
