//! Metronome track rendering and pulse extraction.

use log::{debug, info};
use noiseclick_dsp::{trim_pulse, Stft, TailConfig, TimeVaryingFilter};

use crate::envelope::apply_per_beat;
use crate::error::MetronomeResult;
use crate::noise::white_noise;
use crate::post::{highpass, normalize_peak, soft_clip_tanh, OUTPUT_PEAK};
use crate::preset::MetronomePreset;
use crate::schedule::BeatSchedule;

/// A rendered mono track.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTrack {
    /// Samples in `[-OUTPUT_PEAK, OUTPUT_PEAK]`.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl RenderedTrack {
    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// The first accented and first regular click cut from a track.
#[derive(Debug, Clone, PartialEq)]
pub struct Pulses {
    /// Pulse cut from beat 0.
    pub accent: Vec<f64>,
    /// Pulse cut from beat 1.
    pub nonaccent: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Pulses {
    /// Accent pulse duration in seconds.
    pub fn accent_duration(&self) -> f64 {
        self.accent.len() as f64 / self.sample_rate as f64
    }

    /// Regular pulse duration in seconds.
    pub fn nonaccent_duration(&self) -> f64 {
        self.nonaccent.len() as f64 / self.sample_rate as f64
    }
}

/// Renders a full metronome track.
///
/// Seeded noise is shaped by the per-beat spectral schedule, then passes
/// through the beat envelopes, the highpass, the soft clipper and peak
/// normalization.
pub fn render(preset: &MetronomePreset) -> MetronomeResult<RenderedTrack> {
    preset.validate()?;
    let config = preset.transform_config()?;
    let total = preset.total_samples();
    debug!(
        "rendering {} beats at {} bpm: {} samples, N={}, hop={}",
        preset.beats,
        preset.bpm,
        total,
        config.frame_size(),
        config.hop()
    );

    let noise = white_noise(preset.seed, total);
    let stft = Stft::new(config);
    let mut frames = stft.forward(&noise);
    TimeVaryingFilter::new(config, BeatSchedule::from_preset(preset)).apply(&mut frames)?;
    let mut samples = stft.inverse(&frames, Some(total))?;

    apply_per_beat(
        &mut samples,
        &preset.envelope,
        preset.samples_per_beat(),
        preset.beats as usize,
        preset.sample_rate,
    );
    highpass(&mut samples, preset.hpf_hz, preset.sample_rate);
    soft_clip_tanh(&mut samples, preset.drive_db);
    normalize_peak(&mut samples, OUTPUT_PEAK);

    info!(
        "rendered {:.2} s metronome track (seed {})",
        total as f64 / preset.sample_rate as f64,
        preset.seed
    );
    Ok(RenderedTrack {
        samples,
        sample_rate: preset.sample_rate,
    })
}

/// Cuts beat `index` out of `track` and trims it to its decay tail.
///
/// Returns an empty pulse when the beat starts past the end of the track.
pub fn extract_beat_pulse(
    track: &[f64],
    preset: &MetronomePreset,
    index: usize,
    tail: &TailConfig,
) -> Vec<f64> {
    let n = preset.samples_per_beat();
    let start = index * n;
    if start >= track.len() {
        return Vec::new();
    }
    let end = (start + n).min(track.len());
    trim_pulse(&track[start..end], preset.sample_rate, tail)
}

/// Extracts the accent (beat 0) and regular (beat 1) pulses from a track.
pub fn extract_pulses(
    track: &RenderedTrack,
    preset: &MetronomePreset,
    tail: &TailConfig,
) -> Pulses {
    let accent = extract_beat_pulse(&track.samples, preset, 0, tail);
    let nonaccent = extract_beat_pulse(&track.samples, preset, 1, tail);
    debug!(
        "pulses: accent {} samples, nonaccent {} samples",
        accent.len(),
        nonaccent.len()
    );
    Pulses {
        accent,
        nonaccent,
        sample_rate: track.sample_rate,
    }
}

/// Renders a track and cuts its two pulses.
///
/// `threshold_db` overrides the preset's tail threshold when given.
pub fn render_pulses(
    preset: &MetronomePreset,
    threshold_db: Option<f64>,
) -> MetronomeResult<(RenderedTrack, Pulses)> {
    let track = render(preset)?;
    let mut tail = preset.tail_config();
    if let Some(threshold_db) = threshold_db {
        tail.threshold_db = threshold_db;
    }
    let pulses = extract_pulses(&track, preset, &tail);
    Ok((track, pulses))
}
