//! Tail measurement against analytically known decays.

use std::f64::consts::PI;

use noiseclick_dsp::{measure_tail, trim_pulse, TailConfig};

/// `exp(-t / tau) * sin(2 pi f t)` sampled at `sample_rate`.
fn decaying_sine(freq: f64, tau: f64, seconds: f64, sample_rate: u32) -> Vec<f64> {
    let fs = sample_rate as f64;
    let n = (seconds * fs) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / fs;
            (-t / tau).exp() * (2.0 * PI * freq * t).sin()
        })
        .collect()
}

/// Sample index where the sine's RMS envelope `exp(-t/tau) / sqrt(2)` reaches
/// the threshold.
fn predicted_crossing(tau: f64, threshold_db: f64, sample_rate: u32) -> f64 {
    let threshold = 10.0_f64.powf(threshold_db / 20.0);
    let t = tau * (1.0 / (threshold * 2.0_f64.sqrt())).ln();
    t * sample_rate as f64
}

fn assert_tail_matches(freq: f64, tau: f64, seconds: f64, sample_rate: u32, cfg: TailConfig) {
    let x = decaying_sine(freq, tau, seconds, sample_rate);
    let m = measure_tail(&x, sample_rate, &cfg);
    assert!(m.crossed);

    let expected = predicted_crossing(tau, cfg.threshold_db, sample_rate) - m.peak_index as f64;
    let window = cfg.window_samples(sample_rate) as f64;
    let error = (m.offset as f64 - expected).abs();
    assert!(
        error <= window,
        "offset {} vs predicted {:.1} (window {})",
        m.offset,
        expected,
        window
    );
}

#[test]
fn test_tail_of_1khz_decay() {
    assert_tail_matches(1000.0, 0.05, 0.5, 44100, TailConfig::new(-40.0, 5.0));
}

#[test]
fn test_tail_of_slow_440hz_decay() {
    assert_tail_matches(440.0, 0.1, 1.0, 48000, TailConfig::new(-50.0, 10.0));
}

#[test]
fn test_peak_is_first_sine_crest() {
    let x = decaying_sine(1000.0, 0.05, 0.5, 44100);
    let m = measure_tail(&x, 44100, &TailConfig::new(-40.0, 5.0));
    // Quarter period of 1 kHz at 44.1 kHz is about 11 samples
    assert!((10..=12).contains(&m.peak_index), "peak {}", m.peak_index);
}

#[test]
fn test_trimmed_pulse_ends_silently() {
    let x = decaying_sine(1000.0, 0.05, 0.5, 44100);
    let cfg = TailConfig::new(-40.0, 5.0);
    let m = measure_tail(&x, 44100, &cfg);
    let pulse = trim_pulse(&x, 44100, &cfg);
    assert_eq!(pulse.len(), m.offset + 1);
    assert_eq!(*pulse.last().unwrap(), 0.0);
    assert!(pulse.len() < x.len());
}

#[test]
fn test_undecayed_signal_keeps_remaining_length() {
    let x = decaying_sine(1000.0, 10.0, 0.1, 44100);
    let m = measure_tail(&x, 44100, &TailConfig::new(-40.0, 5.0));
    assert!(!m.crossed);
    assert_eq!(m.peak_index + m.offset, x.len());
}
