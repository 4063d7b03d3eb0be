//! Post-processing applied to a rendered click track.

use std::f64::consts::PI;

use noiseclick_dsp::util::{db_to_linear, peak_abs};

/// Peak level rendered metronome tracks are scaled to.
pub const OUTPUT_PEAK: f64 = 0.9;

/// Added to the measured peak before scaling so silence stays finite.
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// One-pole highpass filter (RC differentiator).
///
/// `y[n] = alpha * (y[n-1] + x[n] - x[n-1])` with `alpha = rc / (rc + dt)`.
#[derive(Debug, Clone)]
pub struct OnePoleHighpass {
    alpha: f64,
    x1: f64,
    y1: f64,
}

impl OnePoleHighpass {
    /// Creates a new one-pole highpass filter.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz (must be positive)
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(cutoff: f64, sample_rate: f64) -> Self {
        let rc = 1.0 / (2.0 * PI * cutoff);
        let dt = 1.0 / sample_rate;
        Self {
            alpha: rc / (rc + dt),
            x1: 0.0,
            y1: 0.0,
        }
    }

    /// The feedback coefficient.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.alpha * (self.y1 + input - self.x1);
        self.x1 = input;
        self.y1 = output;
        output
    }

    /// Processes a buffer in place.
    pub fn process_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

/// Highpasses `samples` in place; a non-positive cutoff leaves them untouched.
pub fn highpass(samples: &mut [f64], cutoff: f64, sample_rate: u32) {
    if cutoff <= 0.0 || samples.is_empty() {
        return;
    }
    OnePoleHighpass::new(cutoff, sample_rate as f64).process_buffer(samples);
}

/// Gain-normalized tanh saturation: `tanh(g x) / tanh(g)` with
/// `g = 10^(drive_db / 20)`.
///
/// Drives at or below unity gain bypass the stage, so full-scale input still
/// maps to full scale when it does run.
pub fn soft_clip_tanh(samples: &mut [f64], drive_db: f64) {
    let gain = db_to_linear(drive_db);
    if gain <= 1.0 {
        return;
    }
    let norm = gain.tanh();
    for sample in samples.iter_mut() {
        *sample = (gain * *sample).tanh() / norm;
    }
}

/// Scales `samples` so the largest magnitude becomes `target_peak`.
///
/// Silent buffers are left as they are.
pub fn normalize_peak(samples: &mut [f64], target_peak: f64) {
    let current_peak = peak_abs(samples);
    if current_peak > 0.0 {
        let gain = target_peak / (current_peak + NORMALIZE_EPSILON);
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}
