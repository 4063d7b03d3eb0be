//! Segment ADSR envelopes applied per beat.
//!
//! Unlike a triggered voice envelope, each beat gets a freshly rendered,
//! fixed-length envelope: attack, decay, sustain hold, release, then silence.

use serde::{Deserialize, Serialize};

/// ADSR envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.0015,
            decay: 0.12,
            sustain: 0.0,
            release: 0.06,
        }
    }
}

impl AdsrParams {
    /// Creates new ADSR parameters, clamping times to be non-negative and
    /// sustain to `[0, 1]`.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.0),
        }
    }

    /// Stage lengths in samples, truncated: `(attack, decay, release)`.
    pub fn stage_samples(&self, sample_rate: u32) -> (usize, usize, usize) {
        let fs = sample_rate as f64;
        (
            (self.attack * fs) as usize,
            (self.decay * fs) as usize,
            (self.release * fs) as usize,
        )
    }
}

/// Renders an `n`-sample envelope.
///
/// Attack ramps 0 to 1 without reaching 1 (a single 1.0 when the attack is
/// zero samples), decay ramps 1 toward sustain the same way (a single sustain
/// sample when zero), sustain holds for whatever the other stages leave over,
/// release ramps sustain to 0 inclusive. Stages that run past `n` are cut.
pub fn adsr_segment(n: usize, params: &AdsrParams, sample_rate: u32) -> Vec<f64> {
    let mut env = vec![0.0; n];
    if n == 0 {
        return env;
    }
    let (a, d, r) = params.stage_samples(sample_rate);
    let s_len = n.saturating_sub(a + d + r);
    let sustain = params.sustain;

    if a > 0 {
        fill_ramp(&mut env, 0, a, 0.0, 1.0, false);
    } else {
        env[0] = 1.0;
    }

    if d > 0 {
        fill_ramp(&mut env, a, d, 1.0, sustain, false);
    } else if a < n {
        env[a] = sustain;
    }

    let hold_start = a + d;
    let hold_end = (hold_start + s_len).min(n);
    if hold_start < hold_end {
        env[hold_start..hold_end].fill(sustain);
    }

    if r > 0 {
        fill_ramp(&mut env, hold_start + s_len, r, sustain, 0.0, true);
    }

    env
}

/// Writes a `count`-step linear ramp starting at `start`, dropping any steps
/// that fall past the end of `env`.
fn fill_ramp(env: &mut [f64], start: usize, count: usize, from: f64, to: f64, inclusive: bool) {
    let steps = if inclusive { count - 1 } else { count };
    let end = (start + count).min(env.len());
    for (i, slot) in (start..end).enumerate() {
        let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
        env[slot] = from + (to - from) * t;
    }
}

/// Applies an independent ADSR envelope to each beat of `samples`.
///
/// Beat `b` covers `[b * samples_per_beat, (b + 1) * samples_per_beat)`, cut at
/// the buffer end. Samples outside every beat are silenced.
pub fn apply_per_beat(
    samples: &mut [f64],
    params: &AdsrParams,
    samples_per_beat: usize,
    beats: usize,
    sample_rate: u32,
) {
    let len = samples.len();
    let mut covered = 0;
    for b in 0..beats {
        let start = b * samples_per_beat;
        if start >= len {
            break;
        }
        let end = (start + samples_per_beat).min(len);
        let env = adsr_segment(end - start, params, sample_rate);
        for (s, g) in samples[start..end].iter_mut().zip(env) {
            *s *= g;
        }
        covered = end;
    }
    samples[covered..].fill(0.0);
}
