//! Track playback and FFT analysis.
//!
//! A media element streams a decoded track to the output device; once
//! tapped, it also copies its output into an analyser that the visualizer
//! samples every frame.

mod analyser;
mod decode;
mod element;
mod output;
mod tap;

// Re-export public types
pub use analyser::{blackman_window, Analyser, AnalyserNode, TapInput};
pub use decode::DecodedTrack;
pub use element::{MediaElement, MediaEvent};
pub use output::OutputElement;
pub use tap::{AnalyserTapFactory, AudioTap, TapFactory};
