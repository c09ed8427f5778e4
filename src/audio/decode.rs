//! WAV decoding for track sources.

use std::path::Path;

use crate::error::{PlayerError, Result};

/// Fully decoded track: interleaved f32 samples in [-1, 1]
#[derive(Debug, Clone)]
pub struct DecodedTrack {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl DecodedTrack {
    /// Decode a PCM (8/16/24/32-bit int) or 32-bit float WAV file
    pub fn open(path: &Path) -> Result<Self> {
        let decode_err = |source| PlayerError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = hound::WavReader::open(path).map_err(decode_err)?;
        let spec = reader.spec();

        let samples = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(decode_err)?,
            (hound::SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
                let scale = 1.0 / (1u64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(decode_err)?
            }
            (format, bits) => return Err(PlayerError::UnsupportedFormat { bits, format }),
        };

        Ok(Self {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Length in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Interleaved samples of one frame
    pub fn frame(&self, index: usize) -> &[f32] {
        let channels = self.channels.max(1) as usize;
        let start = index * channels;
        &self.samples[start..start + channels]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, spec: hound::WavSpec, samples: &[i16]) {
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_16_bit_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        // 4000 stereo frames = 0.5 s
        let samples: Vec<i16> = (0..8000)
            .map(|i| if i % 2 == 0 { 16384 } else { -32768 })
            .collect();
        write_wav(&path, spec, &samples);

        let track = DecodedTrack::open(&path).unwrap();
        assert_eq!(track.channels, 2);
        assert_eq!(track.frames(), 4000);
        assert_eq!(track.duration_secs(), 0.5);
        assert_eq!(track.frame(0), &[0.5, -1.0]);
    }

    #[test]
    fn test_decode_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.25f32).unwrap();
        writer.write_sample(-0.75f32).unwrap();
        writer.finalize().unwrap();

        let track = DecodedTrack::open(&path).unwrap();
        assert_eq!(track.samples, vec![0.25, -0.75]);
    }

    #[test]
    fn test_decode_missing_file() {
        let err = DecodedTrack::open(Path::new("/nonexistent/track.wav")).unwrap_err();
        assert!(matches!(err, PlayerError::Decode { .. }));
    }
}
