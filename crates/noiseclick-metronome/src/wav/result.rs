//! WAV file generation result type.

use std::fs;
use std::path::Path;

use log::debug;

use super::format::WavFormat;
use super::writer::{samples_to_pcm16, write_wav_to_vec};
use crate::error::MetronomeResult;

/// Encoded WAV file plus identifying metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM data only.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes mono samples.
    pub fn from_mono(samples: &[f64], sample_rate: u32) -> MetronomeResult<Self> {
        let pcm = samples_to_pcm16(samples);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let wav_data = write_wav_to_vec(&WavFormat::mono(sample_rate), &pcm)?;

        Ok(Self {
            wav_data,
            pcm_hash,
            sample_rate,
            num_samples: samples.len(),
        })
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate as f64
    }

    /// Writes the encoded file to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> MetronomeResult<()> {
        let path = path.as_ref();
        fs::write(path, &self.wav_data)?;
        debug!(
            "wrote {} ({} samples, pcm {})",
            path.display(),
            self.num_samples,
            &self.pcm_hash[..16]
        );
        Ok(())
    }
}
