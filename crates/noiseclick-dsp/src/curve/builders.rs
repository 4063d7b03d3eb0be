//! Band-shaped curve constructors.
//!
//! Builders sample an analytic gain shape at log-spaced frequencies between
//! [`MIN_CURVE_HZ`] and one hertz below Nyquist. Centers outside that range
//! are accepted; the band is simply cut off by the discretization bounds.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::FilterCurve;
use crate::error::{DspError, DspResult};
use crate::util::logspace;

/// Default number of points a builder samples.
pub const DEFAULT_CURVE_POINTS: usize = 256;

/// Lowest frequency covered by built curves.
pub const MIN_CURVE_HZ: f64 = 20.0;

/// Divisor converting a full-width-at-half-maximum (decades) to a Gaussian sigma.
pub const FWHM_TO_SIGMA: f64 = 2.355;

/// Narrowest sigma used when a band width is converted to a Gaussian.
pub const MIN_SIGMA_DEC: f64 = 0.06;

/// Band shape selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandShape {
    /// Gaussian bump in log-frequency.
    #[default]
    LogGaussian,
    /// Raised-cosine band with compact support.
    RaisedCosine,
    /// Five-point triangle peaking at the center.
    Triangular,
}

/// Numeric parameters shared by every band shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    /// Band center in Hz.
    pub center_hz: f64,
    /// Band width in decades (FWHM for the Gaussian shape).
    pub width_dec: f64,
    /// Height of the band above the floor, in dB.
    pub peak_db: f64,
    /// Gain outside the band, in dB.
    pub floor_db: f64,
}

impl BandSpec {
    /// Builds a curve of the given shape for `sample_rate`.
    pub fn build(&self, shape: BandShape, sample_rate: u32) -> DspResult<FilterCurve> {
        match shape {
            BandShape::LogGaussian => {
                let sigma = (self.width_dec / FWHM_TO_SIGMA).max(MIN_SIGMA_DEC);
                log_gaussian(
                    self.center_hz,
                    sigma,
                    self.peak_db,
                    self.floor_db,
                    sample_rate,
                    DEFAULT_CURVE_POINTS,
                )
            }
            BandShape::RaisedCosine => raised_cosine(
                self.center_hz,
                self.width_dec,
                self.peak_db,
                self.floor_db,
                sample_rate,
                DEFAULT_CURVE_POINTS,
            ),
            BandShape::Triangular => triangular(
                self.center_hz,
                self.width_dec,
                self.peak_db,
                self.floor_db,
                sample_rate,
            ),
        }
    }
}

/// `floor_db + peak_db * exp(-0.5 * (log10(f / f0) / sigma_dec)^2)`.
///
/// `sigma_dec` is the standard deviation in decades; the FWHM is about
/// `2.3548 * sigma_dec` decades.
pub fn log_gaussian(
    center_hz: f64,
    sigma_dec: f64,
    peak_db: f64,
    floor_db: f64,
    sample_rate: u32,
    n_points: usize,
) -> DspResult<FilterCurve> {
    check_center(center_hz)?;
    check_width("sigma_dec", sigma_dec)?;
    let freqs = grid(sample_rate, n_points)?;

    let points = freqs
        .into_iter()
        .map(|f| {
            let x = (f / center_hz).log10() / sigma_dec;
            (f, floor_db + peak_db * (-0.5 * x * x).exp())
        })
        .collect();
    FilterCurve::new(points)
}

/// `floor_db + peak_db * 0.5 * (1 + cos(pi * u))` for `|u| <= 1`, else
/// `floor_db`, with `u = log10(f / f0) / (bw_dec / 2)`.
pub fn raised_cosine(
    center_hz: f64,
    bw_dec: f64,
    peak_db: f64,
    floor_db: f64,
    sample_rate: u32,
    n_points: usize,
) -> DspResult<FilterCurve> {
    check_center(center_hz)?;
    check_width("bw_dec", bw_dec)?;
    let freqs = grid(sample_rate, n_points)?;
    let half_width = bw_dec / 2.0;

    let points = freqs
        .into_iter()
        .map(|f| {
            let u = (f / center_hz).log10() / half_width;
            let gain = if u.abs() <= 1.0 {
                floor_db + peak_db * 0.5 * (1.0 + (PI * u).cos())
            } else {
                floor_db
            };
            (f, gain)
        })
        .collect();
    FilterCurve::new(points)
}

/// Triangle in log-frequency: floor at the edges of `bw_dec` around the
/// center, `floor_db + peak_db` at the center.
///
/// Corner points that collapse onto the grid bounds (center too close to 20 Hz
/// or Nyquist) are dropped.
pub fn triangular(
    center_hz: f64,
    bw_dec: f64,
    peak_db: f64,
    floor_db: f64,
    sample_rate: u32,
) -> DspResult<FilterCurve> {
    check_center(center_hz)?;
    check_width("bw_dec", bw_dec)?;
    let f_max = max_curve_hz(sample_rate)?;

    let spread = 10.0_f64.powf(bw_dec / 2.0);
    let lower = (center_hz / spread).max(MIN_CURVE_HZ);
    let upper = (center_hz * spread).min(f_max);

    let candidates = [
        (MIN_CURVE_HZ, floor_db),
        (lower, floor_db),
        (center_hz, floor_db + peak_db),
        (upper, floor_db),
        (f_max, floor_db),
    ];
    let mut points: Vec<(f64, f64)> = Vec::with_capacity(candidates.len());
    for (f, db) in candidates {
        match points.last() {
            Some(&(prev, _)) if f <= prev => {}
            _ => points.push((f, db)),
        }
    }
    FilterCurve::new(points)
}

fn max_curve_hz(sample_rate: u32) -> DspResult<f64> {
    let f_max = sample_rate as f64 / 2.0 - 1.0;
    if f_max <= MIN_CURVE_HZ {
        return Err(DspError::InvalidSampleRate { rate: sample_rate });
    }
    Ok(f_max)
}

fn grid(sample_rate: u32, n_points: usize) -> DspResult<Vec<f64>> {
    if n_points < 2 {
        return Err(DspError::invalid_param(
            "n_points",
            format!("need at least 2 points, got {}", n_points),
        ));
    }
    let f_max = max_curve_hz(sample_rate)?;
    Ok(logspace(MIN_CURVE_HZ, f_max, n_points))
}

fn check_center(center_hz: f64) -> DspResult<()> {
    if !(center_hz.is_finite() && center_hz > 0.0) {
        return Err(DspError::invalid_param(
            "center_hz",
            format!("must be a positive frequency, got {}", center_hz),
        ));
    }
    Ok(())
}

fn check_width(name: &str, width: f64) -> DspResult<()> {
    if !(width.is_finite() && width > 0.0) {
        return Err(DspError::invalid_param(
            name,
            format!("must be positive, got {}", width),
        ));
    }
    Ok(())
}
