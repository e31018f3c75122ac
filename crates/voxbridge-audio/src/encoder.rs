use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("Encoder is not active")]
    NotActive,

    #[error("WAV write error: {0}")]
    Wav(#[from] hound::Error),
}

/// In-memory WAV framer for one utterance.
///
/// Mirrors a recorder driven without a timeslice: samples accumulate
/// while active, and `stop` yields the finished file as a single chunk.
/// Exactly one chunk and one finalize per started utterance.
pub struct WavEncoder {
    sample_rate: u32,
    samples: Vec<i16>,
    active: bool,
}

impl WavEncoder {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin a new utterance. Discards anything left from a previous one.
    pub fn start(&mut self) {
        self.samples.clear();
        self.active = true;
    }

    /// Append captured mono samples. Ignored while inactive, so stray
    /// ticks between a stop and the next start cannot leak audio into
    /// the following clip.
    pub fn append(&mut self, samples: &[f32]) {
        if !self.active {
            return;
        }
        self.samples.extend(
            samples
                .iter()
                .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
        );
    }

    /// Finish the utterance and emit the complete WAV file bytes.
    pub fn stop(&mut self) -> Result<Vec<u8>, EncoderError> {
        if !self.active {
            return Err(EncoderError::NotActive);
        }
        self.active = false;

        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        self.samples.clear();

        Ok(cursor.into_inner())
    }
}
