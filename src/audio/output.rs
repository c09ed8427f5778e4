//! cpal-backed media element playing a decoded track.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use super::decode::DecodedTrack;
use super::element::{MediaElement, MediaEvent};
use super::TapInput;
use crate::error::{PlayerError, Result};
use crate::source::TrackSource;

/// Transport state shared between the UI thread and the audio callback
struct Transport {
    track: Arc<DecodedTrack>,

    /// Play head in (fractional) track frames
    position: f64,

    playing: bool,

    /// Bumped on every play so a stale end-of-track report can be told apart
    generation: u64,

    volume: f32,
    tap: Option<TapInput>,

    /// Mono mix handed to the tap, reused across callbacks
    mix: Vec<f32>,
}

impl Transport {
    fn new(track: Arc<DecodedTrack>) -> Self {
        Self {
            track,
            position: 0.0,
            playing: false,
            generation: 0,
            volume: 1.0,
            tap: None,
            mix: Vec::new(),
        }
    }

    fn play(&mut self) {
        // Playing a finished track starts it over
        if self.position as usize >= self.track.frames() {
            self.position = 0.0;
        }
        self.playing = true;
        self.generation += 1;
    }

    /// Fill one interleaved output buffer.
    ///
    /// `step` is track frames per output frame. Returns true if the track
    /// ended during this buffer.
    fn render(&mut self, data: &mut [f32], out_channels: usize, step: f64) -> bool {
        let frames = self.track.frames();
        let track_channels = self.track.channels.max(1) as usize;
        let mut ended = false;
        self.mix.clear();

        for out_frame in data.chunks_mut(out_channels.max(1)) {
            let index = self.position as usize;
            if !self.playing || index >= frames {
                out_frame.fill(0.0);
                if self.playing {
                    self.playing = false;
                    self.position = frames as f64;
                    ended = true;
                }
                continue;
            }

            let frame = self.track.frame(index);
            for (ch, slot) in out_frame.iter_mut().enumerate() {
                *slot = frame[ch.min(track_channels - 1)] * self.volume;
            }
            let mono: f32 = frame.iter().sum::<f32>() / track_channels as f32;
            self.mix.push(mono * self.volume);

            self.position += step;
        }

        if let Some(tap) = &self.tap {
            if !self.mix.is_empty() {
                tap.push(&self.mix);
            }
        }

        ended
    }
}

/// Drain queued end-of-track reports, keeping only those from the current play
fn drain_ended(ended_rx: &Receiver<u64>, generation: u64) -> bool {
    ended_rx.try_iter().filter(|&g| g == generation).count() > 0
}

/// Media element that streams a decoded WAV to the default output device
pub struct OutputElement {
    source: TrackSource,
    transport: Arc<Mutex<Transport>>,
    sample_rate: u32,
    ended_rx: Receiver<u64>,
    last_reported_time: f64,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl OutputElement {
    /// Decode the source and open a (silent until played) output stream
    pub fn open(source: TrackSource) -> Result<Self> {
        let track = Arc::new(DecodedTrack::open(source.path())?);
        info!(
            "Track: {} ({} ch @ {}Hz, {:.1}s)",
            source.path().display(),
            track.channels,
            track.sample_rate,
            track.duration_secs()
        );

        let sample_rate = track.sample_rate;
        let transport = Arc::new(Mutex::new(Transport::new(Arc::clone(&track))));
        let transport_cb = Arc::clone(&transport);
        let (ended_tx, ended_rx): (Sender<u64>, Receiver<u64>) = bounded(4);

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlayerError::NoOutputDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| PlayerError::Stream(format!("failed to get output config: {}", e)))?;

        info!(
            "Audio: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate().0
        );

        let out_channels = config.channels() as usize;
        let step = sample_rate as f64 / config.sample_rate().0 as f64;

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut transport) = transport_cb.lock() else {
                        data.fill(0.0);
                        return;
                    };
                    if transport.render(data, out_channels, step) {
                        let _ = ended_tx.try_send(transport.generation);
                    }
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| PlayerError::Stream(format!("failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| PlayerError::Stream(format!("failed to start stream: {}", e)))?;

        Ok(Self {
            source,
            transport,
            sample_rate,
            ended_rx,
            last_reported_time: 0.0,
            _stream: stream,
        })
    }

    fn with_transport<T>(&self, f: impl FnOnce(&mut Transport) -> T) -> T {
        let mut guard = self
            .transport
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl MediaElement for OutputElement {
    fn source(&self) -> &TrackSource {
        &self.source
    }

    fn play(&mut self) -> Result<()> {
        self.with_transport(Transport::play);
        Ok(())
    }

    fn pause(&mut self) {
        self.with_transport(|t| t.playing = false);
    }

    fn paused(&self) -> bool {
        self.with_transport(|t| !t.playing)
    }

    fn volume(&self) -> f32 {
        self.with_transport(|t| t.volume)
    }

    fn set_volume(&mut self, volume: f32) {
        self.with_transport(|t| t.volume = volume);
    }

    fn current_time(&self) -> f64 {
        let rate = self.sample_rate;
        self.with_transport(|t| {
            if rate == 0 {
                0.0
            } else {
                t.position / rate as f64
            }
        })
    }

    fn set_current_time(&mut self, seconds: f64) {
        let rate = self.sample_rate as f64;
        self.with_transport(|t| {
            let frames = t.track.frames() as f64;
            t.position = (seconds * rate).clamp(0.0, frames);
        });
    }

    fn duration(&self) -> Option<f64> {
        if self.sample_rate == 0 {
            return None;
        }
        Some(self.with_transport(|t| t.track.duration_secs()))
    }

    fn connect_tap(&mut self, input: TapInput) {
        self.with_transport(|t| t.tap = Some(input));
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        let mut events = Vec::new();

        let now = self.current_time();
        if now != self.last_reported_time {
            self.last_reported_time = now;
            events.push(MediaEvent::TimeUpdate);
        }

        let generation = self.with_transport(|t| t.generation);
        if drain_ended(&self.ended_rx, generation) {
            events.push(MediaEvent::Ended);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AnalyserNode;
    use crate::params::AnalyserConfig;

    fn ramp_track(frames: usize, channels: u16) -> Arc<DecodedTrack> {
        let samples = (0..frames * channels as usize)
            .map(|i| (i / channels as usize) as f32 / frames as f32)
            .collect();
        Arc::new(DecodedTrack {
            samples,
            channels,
            sample_rate: 100,
        })
    }

    #[test]
    fn test_paused_transport_outputs_silence() {
        let mut transport = Transport::new(ramp_track(10, 1));
        let mut data = vec![1.0; 8];
        assert!(!transport.render(&mut data, 2, 1.0));
        assert!(data.iter().all(|&s| s == 0.0));
        assert_eq!(transport.position, 0.0);
    }

    #[test]
    fn test_mono_track_fans_out_to_stereo() {
        let mut transport = Transport::new(ramp_track(10, 1));
        transport.playing = true;
        transport.volume = 0.5;

        let mut data = vec![0.0; 4];
        transport.render(&mut data, 2, 1.0);
        assert_eq!(data, vec![0.0, 0.0, 0.05, 0.05]);
        assert_eq!(transport.position, 2.0);
    }

    #[test]
    fn test_end_of_track_stops_and_reports() {
        let mut transport = Transport::new(ramp_track(3, 2));
        transport.playing = true;

        let mut data = vec![0.0; 10];
        assert!(transport.render(&mut data, 2, 1.0));
        assert!(!transport.playing);
        assert_eq!(transport.position, 3.0);

        // Already stopped: no second report
        assert!(!transport.render(&mut data, 2, 1.0));
    }

    #[test]
    fn test_replay_discards_earlier_end_report() {
        let (ended_tx, ended_rx) = bounded(4);
        let mut transport = Transport::new(ramp_track(3, 1));
        let mut data = vec![0.0; 8];

        transport.play();
        assert!(transport.render(&mut data, 1, 1.0));
        ended_tx.try_send(transport.generation).unwrap();

        // Replayed before the report was polled: it belongs to the old play
        transport.play();
        assert!(transport.playing);
        assert_eq!(transport.position, 0.0);
        assert!(!drain_ended(&ended_rx, transport.generation));

        assert!(transport.render(&mut data, 1, 1.0));
        ended_tx.try_send(transport.generation).unwrap();
        assert!(drain_ended(&ended_rx, transport.generation));
        assert!(!drain_ended(&ended_rx, transport.generation));
    }

    #[test]
    fn test_rendered_audio_reaches_tap() {
        let node = AnalyserNode::new(AnalyserConfig::default()).unwrap();
        let mut transport = Transport::new(Arc::new(DecodedTrack {
            samples: (0..512)
                .map(|i| (2.0 * std::f32::consts::PI * 8.0 * i as f32 / 256.0).sin())
                .collect(),
            channels: 1,
            sample_rate: 44100,
        }));
        transport.playing = true;
        transport.tap = Some(node.input());

        let mut data = vec![0.0; 512];
        transport.render(&mut data, 1, 1.0);

        let mut frame = vec![0u8; node.frequency_bin_count()];
        node.get_byte_frequency_data(&mut frame);
        assert_eq!(frame[8], 255);
    }
}
