//! End-to-end filtering of white noise through the spectral core.

use noiseclick_dsp::curve::raised_cosine;
use noiseclick_dsp::{FilterCurve, Stft, TimeVaryingFilter, TransformConfig};
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_pcg::Pcg32;

const SAMPLE_RATE: u32 = 44100;

fn white_noise(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..len).map(|_| rng.sample(StandardNormal)).collect()
}

/// Mean power per bin, averaged over all STFT frames of `signal`.
fn power_spectrum(stft: &Stft, signal: &[f64]) -> Vec<f64> {
    let frames = stft.forward(signal);
    let mut psd = vec![0.0; frames.bins_per_frame()];
    for frame in frames.frames() {
        for (p, x) in psd.iter_mut().zip(frame.iter()) {
            *p += x.norm_sqr();
        }
    }
    let count = frames.len() as f64;
    psd.iter_mut().for_each(|p| *p /= count);
    psd
}

fn band_mean(psd: &[f64], freqs: &[f64], lo: f64, hi: f64) -> f64 {
    let values: Vec<f64> = psd
        .iter()
        .zip(freqs.iter())
        .filter(|(_, &f)| f >= lo && f <= hi)
        .map(|(&p, _)| p)
        .collect();
    assert!(!values.is_empty(), "no bins between {} and {} Hz", lo, hi);
    values.iter().sum::<f64>() / values.len() as f64
}

fn filter_noise<S: noiseclick_dsp::CurveSchedule>(schedule: S) -> (Stft, Vec<f64>) {
    let config = TransformConfig::with_hop(SAMPLE_RATE, 1024, 512).unwrap();
    let stft = Stft::new(config);
    let filter = TimeVaryingFilter::new(config, schedule);

    let x = white_noise(2024, 2 * SAMPLE_RATE as usize);
    let mut frames = stft.forward(&x);
    filter.apply(&mut frames).unwrap();
    let y = stft.inverse(&frames, Some(x.len())).unwrap();
    assert_eq!(y.len(), x.len());
    (stft, y)
}

#[test]
fn test_raised_cosine_band_attenuates_out_of_band_noise() {
    let band = raised_cosine(1000.0, 0.5, 20.0, -40.0, SAMPLE_RATE, 256).unwrap();
    let (stft, y) = filter_noise(band);
    assert!(y.iter().all(|s| s.is_finite()));

    let psd = power_spectrum(&stft, &y);
    let freqs = stft.config().bin_frequencies();
    let in_band = band_mean(&psd, &freqs, 900.0, 1100.0);
    let out_band = band_mean(&psd, &freqs, 4000.0, 6000.0);
    assert!(
        in_band > 10.0 * out_band,
        "in-band {} vs out-of-band {}",
        in_band,
        out_band
    );
}

#[test]
fn test_flat_curve_leaves_noise_spectrum_white() {
    let (stft, y) = filter_noise(FilterCurve::flat(0.0).unwrap());
    let psd = power_spectrum(&stft, &y);
    let freqs = stft.config().bin_frequencies();
    let low = band_mean(&psd, &freqs, 900.0, 1100.0);
    let high = band_mean(&psd, &freqs, 4000.0, 6000.0);
    let ratio = low / high;
    assert!(ratio > 0.5 && ratio < 2.0, "ratio {}", ratio);
}

#[test]
fn test_filtering_is_deterministic() {
    let band = raised_cosine(3000.0, 0.4, 30.0, -30.0, SAMPLE_RATE, 128).unwrap();
    let (_, a) = filter_noise(band.clone());
    let (_, b) = filter_noise(band);
    assert_eq!(a, b);
}
