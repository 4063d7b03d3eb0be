//! Decay-tail measurement and pulse trimming.
//!
//! The tail of a percussive event is located by smoothing the squared signal
//! with a short centered moving average, starting at the loudest sample and
//! scanning forward until the local RMS drops below a threshold.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::util::{db_to_linear, linspace, peak_index};

/// Default tail threshold in dBFS.
pub const DEFAULT_TAIL_THRESHOLD_DB: f64 = -55.0;

/// Default RMS smoothing window in milliseconds.
pub const DEFAULT_RMS_WINDOW_MS: f64 = 5.0;

/// Fade-out length heuristic applied after trimming.
///
/// The fade is `min(max_s * fs, max(min_samples, min_s * fs))` samples long.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeConfig {
    /// Upper bound on the fade in seconds.
    pub max_s: f64,
    /// Preferred lower bound on the fade in seconds.
    pub min_s: f64,
    /// Lower bound on the fade in samples.
    pub min_samples: usize,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            max_s: 0.002,
            min_s: 0.0005,
            min_samples: 8,
        }
    }
}

impl FadeConfig {
    /// Fade length in samples at `sample_rate`. Both durations truncate to
    /// whole samples.
    pub fn fade_len(&self, sample_rate: u32) -> usize {
        let fs = sample_rate as f64;
        let upper = (self.max_s * fs) as usize;
        let lower = self.min_samples.max((self.min_s * fs) as usize);
        upper.min(lower)
    }
}

/// Tail measurement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailConfig {
    /// Level in dB the smoothed RMS must fall below.
    pub threshold_db: f64,
    /// Moving-average window in milliseconds.
    pub rms_window_ms: f64,
    /// Fade applied by [`trim_pulse`].
    #[serde(default)]
    pub fade: FadeConfig,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            threshold_db: DEFAULT_TAIL_THRESHOLD_DB,
            rms_window_ms: DEFAULT_RMS_WINDOW_MS,
            fade: FadeConfig::default(),
        }
    }
}

impl TailConfig {
    /// Config with the given threshold and window and the default fade.
    pub fn new(threshold_db: f64, rms_window_ms: f64) -> Self {
        Self {
            threshold_db,
            rms_window_ms,
            fade: FadeConfig::default(),
        }
    }

    /// Moving-average window length in samples, at least one.
    pub fn window_samples(&self, sample_rate: u32) -> usize {
        let samples = (sample_rate as f64 * self.rms_window_ms / 1000.0).round();
        if samples.is_finite() && samples >= 1.0 {
            samples as usize
        } else {
            1
        }
    }
}

/// Where a signal's tail falls below the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailMeasurement {
    /// Index of the first sample with the largest magnitude.
    pub peak_index: usize,
    /// Samples after the peak at which the RMS first fell below threshold,
    /// or the remaining length when it never did.
    pub offset: usize,
    /// Whether the threshold was actually crossed.
    pub crossed: bool,
}

impl TailMeasurement {
    /// Absolute index of the crossing sample.
    pub fn end_index(&self) -> usize {
        self.peak_index + self.offset
    }
}

/// Centered moving RMS with `window` taps.
///
/// Output `i` averages `x^2` over `[i - window/2, i + (window-1)/2]`, treating
/// samples outside the signal as zero and always dividing by `window`.
pub fn moving_rms(signal: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let len = signal.len();

    let mut prefix = Vec::with_capacity(len + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &s in signal {
        acc += s * s;
        prefix.push(acc);
    }

    let back = window / 2;
    let ahead = (window - 1) / 2;
    let scale = 1.0 / window as f64;
    (0..len)
        .map(|i| {
            let lo = i.saturating_sub(back);
            let hi = (i + ahead + 1).min(len);
            // Cancellation in the prefix difference can dip below zero.
            ((prefix[hi] - prefix[lo]) * scale).max(0.0).sqrt()
        })
        .collect()
}

/// Measures where the decay after the loudest sample drops below
/// `config.threshold_db`.
pub fn measure_tail(signal: &[f64], sample_rate: u32, config: &TailConfig) -> TailMeasurement {
    let Some(peak) = peak_index(signal) else {
        return TailMeasurement {
            peak_index: 0,
            offset: 0,
            crossed: false,
        };
    };

    let threshold = db_to_linear(config.threshold_db);
    let window = config.window_samples(sample_rate);
    let rms = moving_rms(signal, window);

    match rms[peak..].iter().position(|&r| r < threshold) {
        Some(offset) => {
            debug!(
                "tail below {} dB at {} samples after peak {} (window {})",
                config.threshold_db, offset, peak, window
            );
            TailMeasurement {
                peak_index: peak,
                offset,
                crossed: true,
            }
        }
        None => {
            warn!(
                "tail never fell below {} dB; keeping all {} samples after the peak",
                config.threshold_db,
                signal.len() - peak
            );
            TailMeasurement {
                peak_index: peak,
                offset: signal.len() - peak,
                crossed: false,
            }
        }
    }
}

/// Multiplies the last `fade_len` samples by a linear ramp from 1 to 0.
///
/// Nothing happens unless the buffer is longer than the fade.
pub fn apply_fade_out(samples: &mut [f64], fade_len: usize) {
    if fade_len == 0 || samples.len() <= fade_len {
        return;
    }
    let start = samples.len() - fade_len;
    for (s, g) in samples[start..]
        .iter_mut()
        .zip(linspace(1.0, 0.0, fade_len))
    {
        *s *= g;
    }
}

/// Trims a segment to `offset + 1` samples and fades out the cut.
pub fn trim_pulse(segment: &[f64], sample_rate: u32, config: &TailConfig) -> Vec<f64> {
    let tail = measure_tail(segment, sample_rate, config);
    let cut = segment.len().min(tail.offset + 1);
    let mut pulse = segment[..cut].to_vec();
    apply_fade_out(&mut pulse, config.fade.fade_len(sample_rate));
    pulse
}
