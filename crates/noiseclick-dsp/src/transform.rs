//! Windowed short-time Fourier transform with overlap-add reconstruction.
//!
//! The forward transform pads the signal so the first frame is centered on
//! the first input sample, windows each frame with a symmetric Hann window and
//! keeps the non-negative half spectrum (`N/2 + 1` bins). The inverse rebuilds
//! the full spectrum by Hermitian symmetry, windows again, overlap-adds and
//! divides by the accumulated squared window.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use log::debug;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{DspError, DspResult};

/// Overlap-add normalization below which output samples are left at zero.
pub const OLA_EPSILON: f64 = 1e-8;

/// Validated transform parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformConfig {
    sample_rate: u32,
    frame_size: usize,
    hop: usize,
}

impl TransformConfig {
    /// Creates a config with the default hop of `frame_size / 2`.
    ///
    /// # Errors
    /// Fails when the sample rate is zero or the frame size is zero or odd.
    pub fn new(sample_rate: u32, frame_size: usize) -> DspResult<Self> {
        Self::with_hop(sample_rate, frame_size, frame_size / 2)
    }

    /// Creates a config with an explicit hop size.
    ///
    /// # Errors
    /// Fails when the sample rate is zero, the frame size is zero or odd, or
    /// the hop lies outside `1..=frame_size`.
    pub fn with_hop(sample_rate: u32, frame_size: usize, hop: usize) -> DspResult<Self> {
        if sample_rate == 0 {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        if frame_size == 0 || frame_size % 2 != 0 {
            return Err(DspError::InvalidFrameSize { size: frame_size });
        }
        if hop == 0 || hop > frame_size {
            return Err(DspError::InvalidHop { hop, frame_size });
        }
        Ok(Self {
            sample_rate,
            frame_size,
            hop,
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frame (FFT) size N.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Hop size H.
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of half-spectrum bins, `N/2 + 1`.
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Symmetric Hann window of length N, zero at both ends.
    pub fn window(&self) -> Vec<f64> {
        let n = self.frame_size;
        let denom = (n - 1) as f64;
        (0..n)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / denom).cos())
            .collect()
    }

    /// Center frequency in Hz of every half-spectrum bin.
    pub fn bin_frequencies(&self) -> Vec<f64> {
        let step = self.sample_rate as f64 / self.frame_size as f64;
        (0..self.num_bins()).map(|k| k as f64 * step).collect()
    }

    /// Time in seconds of the start of frame `m` on the padded timeline.
    pub fn frame_time(&self, m: usize) -> f64 {
        (m * self.hop) as f64 / self.sample_rate as f64
    }
}

/// Ordered half-spectrum frames produced by [`Stft::forward`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Vec<Complex<f64>>>,
    bins: usize,
}

impl FrameSequence {
    /// Builds a sequence from raw frames.
    ///
    /// # Errors
    /// Fails when the frames do not all have `bins` entries.
    pub fn from_frames(frames: Vec<Vec<Complex<f64>>>, bins: usize) -> DspResult<Self> {
        if let Some((m, f)) = frames.iter().enumerate().find(|(_, f)| f.len() != bins) {
            return Err(DspError::invalid_param(
                "frames",
                format!("frame {} has {} bins, expected {}", m, f.len(), bins),
            ));
        }
        Ok(Self { frames, bins })
    }

    /// Number of frames M.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Bins per frame, `N/2 + 1`.
    pub fn bins_per_frame(&self) -> usize {
        self.bins
    }

    /// Frame `m`, if present.
    pub fn frame(&self, m: usize) -> Option<&[Complex<f64>]> {
        self.frames.get(m).map(Vec::as_slice)
    }

    /// All frames in order.
    pub fn frames(&self) -> &[Vec<Complex<f64>>] {
        &self.frames
    }

    /// Mutable access to the frames. Frame lengths must not be changed.
    pub fn frames_mut(&mut self) -> &mut [Vec<Complex<f64>>] {
        &mut self.frames
    }
}

/// Forward/inverse windowed transform for one [`TransformConfig`].
pub struct Stft {
    config: TransformConfig,
    window: Vec<f64>,
    window_sq: Vec<f64>,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
    ola_epsilon: f64,
}

impl fmt::Debug for Stft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stft")
            .field("config", &self.config)
            .field("ola_epsilon", &self.ola_epsilon)
            .finish_non_exhaustive()
    }
}

impl Stft {
    /// Plans the FFTs and precomputes the window for `config`.
    pub fn new(config: TransformConfig) -> Self {
        let window = config.window();
        let window_sq = window.iter().map(|w| w * w).collect();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.frame_size());
        let ifft = planner.plan_fft_inverse(config.frame_size());

        Self {
            config,
            window,
            window_sq,
            fft,
            ifft,
            ola_epsilon: OLA_EPSILON,
        }
    }

    /// Overrides the overlap-add normalization threshold.
    pub fn with_ola_epsilon(mut self, epsilon: f64) -> Self {
        self.ola_epsilon = epsilon;
        self
    }

    /// The transform configuration.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// The analysis/synthesis window.
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// Left and right zero padding applied to a signal of `len` samples.
    pub fn padding(&self, len: usize) -> (usize, usize) {
        let n = self.config.frame_size();
        let h = self.config.hop();
        let left = n / 2;
        let right = left + (n - (len + left) % h) % h;
        (left, right)
    }

    /// Windows one frame of N samples and returns its half spectrum.
    ///
    /// Shorter input is zero-extended; longer input is truncated.
    pub fn analyze_frame(&self, segment: &[f64]) -> Vec<Complex<f64>> {
        let n = self.config.frame_size();
        let mut buffer: Vec<Complex<f64>> = (0..n)
            .map(|i| {
                let s = segment.get(i).copied().unwrap_or(0.0);
                Complex::new(s * self.window[i], 0.0)
            })
            .collect();
        self.fft.process(&mut buffer);
        buffer.truncate(self.config.num_bins());
        buffer
    }

    /// Inverse-transforms one half spectrum to N real samples (no window).
    ///
    /// The discarded half is rebuilt by Hermitian symmetry; the imaginary
    /// parts of the DC and Nyquist bins are ignored.
    pub fn synthesize_frame(&self, bins: &[Complex<f64>]) -> Vec<f64> {
        let n = self.config.frame_size();
        let half = n / 2;
        let bin = |k: usize| bins.get(k).copied().unwrap_or_default();

        let mut buffer = vec![Complex::new(0.0, 0.0); n];
        buffer[0] = Complex::new(bin(0).re, 0.0);
        for k in 1..half {
            let v = bin(k);
            buffer[k] = v;
            buffer[n - k] = v.conj();
        }
        buffer[half] = Complex::new(bin(half).re, 0.0);

        self.ifft.process(&mut buffer);

        let scale = 1.0 / n as f64;
        buffer.iter().map(|c| c.re * scale).collect()
    }

    /// Forward transform of a complete signal.
    pub fn forward(&self, signal: &[f64]) -> FrameSequence {
        let n = self.config.frame_size();
        let h = self.config.hop();
        let (left, right) = self.padding(signal.len());

        let mut padded = vec![0.0; left + signal.len() + right];
        padded[left..left + signal.len()].copy_from_slice(signal);

        let num_frames = 1 + (padded.len() - n) / h;
        debug!(
            "stft forward: {} samples, pad ({}, {}), {} frames (N={}, hop={})",
            signal.len(),
            left,
            right,
            num_frames,
            n,
            h
        );

        let frames = (0..num_frames)
            .map(|m| {
                let start = m * h;
                self.analyze_frame(&padded[start..start + n])
            })
            .collect();

        FrameSequence {
            frames,
            bins: self.config.num_bins(),
        }
    }

    /// Inverse transform with overlap-add and squared-window normalization.
    ///
    /// The centering pad is removed. With `out_len` the result is truncated or
    /// zero-extended to exactly that many samples; without it the full
    /// reconstructed tail is returned.
    ///
    /// # Errors
    /// Fails when the frames do not have `N/2 + 1` bins.
    pub fn inverse(&self, frames: &FrameSequence, out_len: Option<usize>) -> DspResult<Vec<f64>> {
        let n = self.config.frame_size();
        let h = self.config.hop();
        if frames.bins_per_frame() != self.config.num_bins() {
            return Err(DspError::invalid_param(
                "frames",
                format!(
                    "frames have {} bins, transform expects {}",
                    frames.bins_per_frame(),
                    self.config.num_bins()
                ),
            ));
        }

        let total_len = frames.len() * h + n;
        let mut output = vec![0.0; total_len];
        let mut norm = vec![0.0; total_len];

        for (m, bins) in frames.frames().iter().enumerate() {
            let start = m * h;
            let time = self.synthesize_frame(bins);
            for i in 0..n {
                output[start + i] += time[i] * self.window[i];
                norm[start + i] += self.window_sq[i];
            }
        }

        for (y, &w) in output.iter_mut().zip(norm.iter()) {
            if w > self.ola_epsilon {
                *y /= w;
            } else {
                *y = 0.0;
            }
        }

        output.drain(..n / 2);
        if let Some(len) = out_len {
            output.resize(len, 0.0);
        }

        debug!(
            "stft inverse: {} frames -> {} samples",
            frames.len(),
            output.len()
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signal(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let t = i as f64;
                (0.013 * t).sin() + 0.5 * (0.31 * t).cos() - 0.25 * (1.7 * t).sin()
            })
            .collect()
    }

    fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_config_rejects_odd_frame_size() {
        assert_eq!(
            TransformConfig::new(44100, 1023),
            Err(DspError::InvalidFrameSize { size: 1023 })
        );
        assert_eq!(
            TransformConfig::new(44100, 0),
            Err(DspError::InvalidFrameSize { size: 0 })
        );
    }

    #[test]
    fn test_config_rejects_bad_hop() {
        assert!(matches!(
            TransformConfig::with_hop(44100, 1024, 0),
            Err(DspError::InvalidHop { hop: 0, .. })
        ));
        assert!(matches!(
            TransformConfig::with_hop(44100, 1024, 1025),
            Err(DspError::InvalidHop { hop: 1025, .. })
        ));
        assert!(TransformConfig::with_hop(44100, 1024, 1024).is_ok());
        assert!(TransformConfig::with_hop(44100, 1024, 1).is_ok());
    }

    #[test]
    fn test_config_rejects_zero_sample_rate() {
        assert_eq!(
            TransformConfig::new(0, 1024),
            Err(DspError::InvalidSampleRate { rate: 0 })
        );
    }

    #[test]
    fn test_default_hop_is_half_frame() {
        let cfg = TransformConfig::new(44100, 1024).unwrap();
        assert_eq!(cfg.hop(), 512);
        assert_eq!(cfg.num_bins(), 513);
    }

    #[test]
    fn test_window_shape() {
        let cfg = TransformConfig::new(8000, 64).unwrap();
        let w = cfg.window();
        assert_eq!(w.len(), 64);
        assert!(w[0].abs() < 1e-12);
        assert!(w[63].abs() < 1e-12);
        // Symmetric
        for i in 0..32 {
            assert!((w[i] - w[63 - i]).abs() < 1e-12);
        }
        assert!(w.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn test_bin_frequencies() {
        let cfg = TransformConfig::new(44100, 1024).unwrap();
        let f = cfg.bin_frequencies();
        assert_eq!(f.len(), 513);
        assert_eq!(f[0], 0.0);
        assert!((f[512] - 22050.0).abs() < 1e-9);
        assert!((f[1] - 44100.0 / 1024.0).abs() < 1e-12);
    }

    #[test]
    fn test_padding_formula() {
        let stft = Stft::new(TransformConfig::new(44100, 1024).unwrap());
        // (1000 + 512) % 512 = 488 -> right = 512 + (1024 - 488) % 512 = 512 + 24
        assert_eq!(stft.padding(1000), (512, 536));
        let (l, r) = stft.padding(1000);
        assert_eq!((l + 1000 + r - 1024) % 512, 0);
    }

    #[test]
    fn test_forward_frame_shape() {
        let stft = Stft::new(TransformConfig::new(44100, 256).unwrap());
        let frames = stft.forward(&test_signal(1000));
        assert_eq!(frames.bins_per_frame(), 129);
        assert!(frames.frames().iter().all(|f| f.len() == 129));
        let (l, r) = stft.padding(1000);
        assert_eq!(frames.len(), 1 + (l + 1000 + r - 256) / 128);
    }

    #[test]
    fn test_round_trip_default_hop() {
        let stft = Stft::new(TransformConfig::new(44100, 512).unwrap());
        let x = test_signal(5000);
        let y = stft.inverse(&stft.forward(&x), Some(x.len())).unwrap();
        assert_eq!(y.len(), x.len());
        assert!(max_abs_diff(&x, &y) < 1e-9);
    }

    #[test]
    fn test_round_trip_quarter_hop() {
        let stft = Stft::new(TransformConfig::with_hop(22050, 256, 64).unwrap());
        let x = test_signal(3001);
        let y = stft.inverse(&stft.forward(&x), Some(x.len())).unwrap();
        assert!(max_abs_diff(&x, &y) < 1e-9);
    }

    #[test]
    fn test_inverse_without_length_keeps_signal_prefix() {
        let stft = Stft::new(TransformConfig::new(44100, 128).unwrap());
        let x = test_signal(700);
        let y = stft.inverse(&stft.forward(&x), None).unwrap();
        assert!(y.len() >= x.len());
        assert!(max_abs_diff(&x, &y[..x.len()]) < 1e-9);
    }

    #[test]
    fn test_inverse_zero_extends() {
        let stft = Stft::new(TransformConfig::new(44100, 128).unwrap());
        let x = test_signal(300);
        let frames = stft.forward(&x);
        let y = stft.inverse(&frames, Some(5000)).unwrap();
        assert_eq!(y.len(), 5000);
        assert!(y[4000..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_empty_signal() {
        let stft = Stft::new(TransformConfig::new(44100, 64).unwrap());
        let frames = stft.forward(&[]);
        assert_eq!(frames.len(), 1);
        let y = stft.inverse(&frames, Some(0)).unwrap();
        assert!(y.is_empty());
    }

    #[test]
    fn test_inverse_rejects_mismatched_bins() {
        let small = Stft::new(TransformConfig::new(44100, 64).unwrap());
        let large = Stft::new(TransformConfig::new(44100, 128).unwrap());
        let frames = small.forward(&test_signal(200));
        assert!(large.inverse(&frames, None).is_err());
    }

    #[test]
    fn test_synthesize_frame_inverts_analysis() {
        let stft = Stft::new(TransformConfig::new(8000, 32).unwrap());
        let segment = test_signal(32);
        let bins = stft.analyze_frame(&segment);
        let time = stft.synthesize_frame(&bins);
        for i in 0..32 {
            assert!((time[i] - segment[i] * stft.window()[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_frame_sequence_validation() {
        let ok = FrameSequence::from_frames(vec![vec![Complex::new(0.0, 0.0); 5]; 3], 5);
        assert!(ok.is_ok());
        let bad = FrameSequence::from_frames(
            vec![vec![Complex::new(0.0, 0.0); 5], vec![Complex::new(0.0, 0.0); 4]],
            5,
        );
        assert!(bad.is_err());

        let seq = FrameSequence::from_frames(Vec::new(), 3).unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.bins_per_frame(), 3);
    }

    fn zeroed_indices(y: &[f64]) -> Vec<usize> {
        y.iter()
            .enumerate()
            .filter(|(_, v)| **v == 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_inverse_zeroes_uncovered_samples_without_hop_overlap() {
        // hop == N leaves the Hann endpoints with zero window-squared sum
        let cfg = TransformConfig::with_hop(8000, 16, 16).unwrap();
        let stft = Stft::new(cfg);
        let x = vec![1.0; 64];
        let frames = stft.forward(&x);
        let y = stft.inverse(&frames, Some(64)).unwrap();

        assert_eq!(y.len(), 64);
        assert!(y.iter().all(|v| v.is_finite()));
        assert_eq!(zeroed_indices(&y), vec![7, 8, 23, 24, 39, 40, 55, 56]);
        for (i, v) in y.iter().enumerate() {
            if *v != 0.0 {
                assert!((v - 1.0).abs() < 1e-9, "sample {} = {}", i, v);
            }
        }
    }

    #[test]
    fn test_inverse_ola_epsilon_override() {
        let cfg = TransformConfig::with_hop(8000, 16, 16).unwrap();
        let x = vec![1.0; 64];
        let default = Stft::new(cfg);
        let y_default = default.inverse(&default.forward(&x), Some(64)).unwrap();

        // w[1]^2 and w[14]^2 are about 1.9e-3, below this epsilon
        let loose = Stft::new(cfg).with_ola_epsilon(0.01);
        let y_loose = loose.inverse(&loose.forward(&x), Some(64)).unwrap();

        let zero_default = zeroed_indices(&y_default);
        let zero_loose = zeroed_indices(&y_loose);
        assert!(zero_default.iter().all(|i| zero_loose.contains(i)));
        assert!(zero_loose.len() > zero_default.len());
        let expected: Vec<usize> = (0..64).filter(|j| (6..=9).contains(&(j % 16))).collect();
        assert_eq!(zero_loose, expected);
        assert!(y_loose.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_window_two_point_is_zero() {
        let cfg = TransformConfig::with_hop(8000, 2, 1).unwrap();
        let w = cfg.window();
        assert_eq!(w.len(), 2);
        assert!(w[0].abs() < 1e-15);
        assert!(w[1].abs() < 1e-15);
    }

    #[test]
    fn test_frame_time() {
        let cfg = TransformConfig::new(44100, 1024).unwrap();
        assert_eq!(cfg.frame_time(0), 0.0);
        assert!((cfg.frame_time(86) - 86.0 * 512.0 / 44100.0).abs() < 1e-12);
    }
}
