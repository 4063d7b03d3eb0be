//! Band sweep test signal.

use log::{debug, info};
use noiseclick_dsp::{Stft, TimeVaryingFilter};

use crate::error::MetronomeResult;
use crate::noise::white_noise;
use crate::post::normalize_peak;
use crate::preset::SweepConfig;
use crate::render::RenderedTrack;
use crate::schedule::SweepSchedule;

/// Summary statistics of a signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStats {
    /// Duration in seconds.
    pub duration_s: f64,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Root-mean-square level.
    pub rms: f64,
}

impl SignalStats {
    /// Computes statistics for `samples` at `sample_rate`.
    pub fn measure(samples: &[f64], sample_rate: u32) -> Self {
        if samples.is_empty() {
            return Self {
                duration_s: 0.0,
                min: 0.0,
                max: 0.0,
                rms: 0.0,
            };
        }
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let energy: f64 = samples.iter().map(|s| s * s).sum();
        Self {
            duration_s: samples.len() as f64 / sample_rate as f64,
            min,
            max,
            rms: (energy / samples.len() as f64).sqrt(),
        }
    }
}

/// Renders noise through a raised-cosine band sweeping from `start_hz` to
/// `end_hz`, normalized to `headroom`.
pub fn render_sweep(config: &SweepConfig) -> MetronomeResult<(RenderedTrack, SignalStats)> {
    config.validate()?;
    let transform = config.transform_config()?;
    let total = config.total_samples();
    debug!(
        "sweep {} Hz -> {} Hz over {} samples",
        config.start_hz, config.end_hz, total
    );

    let mut noise = white_noise(config.seed, total);
    for sample in noise.iter_mut() {
        *sample *= config.input_gain;
    }

    let stft = Stft::new(transform);
    let mut frames = stft.forward(&noise);
    TimeVaryingFilter::new(transform, SweepSchedule::from_config(config)).apply(&mut frames)?;
    let mut samples = stft.inverse(&frames, Some(total))?;
    normalize_peak(&mut samples, config.headroom);

    let stats = SignalStats::measure(&samples, config.sample_rate);
    info!(
        "sweep: {:.2} s, min {:.4}, max {:.4}, rms {:.4}",
        stats.duration_s, stats.min, stats.max, stats.rms
    );
    Ok((
        RenderedTrack {
            samples,
            sample_rate: config.sample_rate,
        },
        stats,
    ))
}
