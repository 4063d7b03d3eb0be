//! Piecewise-linear filter curves in log-frequency / decibel space.

pub mod builders;

pub use builders::{log_gaussian, raised_cosine, triangular, BandShape, BandSpec};

use crate::error::{DspError, DspResult};
use crate::util::{db_to_linear, safe_clip, LOG_EPSILON_HZ};

/// Gain curve defined by `(frequency_hz, gain_db)` control points.
///
/// Evaluation interpolates linearly in `(log10(f), dB)` and holds the first or
/// last gain outside the covered range. Curves are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCurve {
    points: Vec<(f64, f64)>,
    log_freqs: Vec<f64>,
}

impl FilterCurve {
    /// Builds a curve from control points.
    ///
    /// # Errors
    /// Fails when `points` is empty, contains non-finite values, or the
    /// frequencies are not strictly positive and strictly increasing.
    pub fn new(points: Vec<(f64, f64)>) -> DspResult<Self> {
        if points.is_empty() {
            return Err(DspError::invalid_curve("at least one point is required"));
        }
        for (i, &(f, db)) in points.iter().enumerate() {
            if !f.is_finite() || !db.is_finite() {
                return Err(DspError::invalid_curve(format!(
                    "point {} is not finite: ({}, {})",
                    i, f, db
                )));
            }
            if f <= 0.0 {
                return Err(DspError::invalid_curve(format!(
                    "point {} has non-positive frequency {} Hz",
                    i, f
                )));
            }
        }
        if let Some(i) = points.windows(2).position(|w| w[0].0 >= w[1].0) {
            return Err(DspError::invalid_curve(format!(
                "frequencies must be strictly increasing ({} Hz at {} is followed by {} Hz)",
                points[i].0,
                i,
                points[i + 1].0
            )));
        }

        let log_freqs = points.iter().map(|&(f, _)| f.log10()).collect();
        Ok(Self { points, log_freqs })
    }

    /// A single-point curve with the same gain at every frequency.
    pub fn flat(gain_db: f64) -> DspResult<Self> {
        Self::new(vec![(1000.0, gain_db)])
    }

    /// The control points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a curve has at least one point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest control frequencies.
    pub fn frequency_range(&self) -> (f64, f64) {
        let first = self.points[0].0;
        let last = self.points[self.points.len() - 1].0;
        (first, last)
    }

    /// Gain in dB at `freq_hz`. Non-positive frequencies are clamped to a tiny
    /// positive value, so they evaluate to the first point's gain.
    pub fn eval_db(&self, freq_hz: f64) -> f64 {
        let x = safe_clip(freq_hz, LOG_EPSILON_HZ).log10();
        let last = self.points.len() - 1;

        if x <= self.log_freqs[0] {
            return self.points[0].1;
        }
        if x >= self.log_freqs[last] {
            return self.points[last].1;
        }

        // log_freqs[0] < x < log_freqs[last], so 1 <= upper <= last.
        let upper = self.log_freqs.partition_point(|&lx| lx <= x);
        let lower = upper - 1;
        let (x0, x1) = (self.log_freqs[lower], self.log_freqs[upper]);
        let (y0, y1) = (self.points[lower].1, self.points[upper].1);
        let t = (x - x0) / (x1 - x0);
        y0 + t * (y1 - y0)
    }

    /// Linear magnitude `10^(dB/20)` at `freq_hz`.
    pub fn eval_mag(&self, freq_hz: f64) -> f64 {
        db_to_linear(self.eval_db(freq_hz))
    }

    /// [`eval_db`](Self::eval_db) over many frequencies.
    pub fn eval_db_many(&self, freqs_hz: &[f64]) -> Vec<f64> {
        freqs_hz.iter().map(|&f| self.eval_db(f)).collect()
    }

    /// [`eval_mag`](Self::eval_mag) over many frequencies.
    pub fn eval_mag_many(&self, freqs_hz: &[f64]) -> Vec<f64> {
        freqs_hz.iter().map(|&f| self.eval_mag(f)).collect()
    }
}
