//! Time-varying linear-phase filtering of STFT frames.
//!
//! Each frame m is multiplied by `H[k] = |curve(t_m)(f_k)| * e^{-i pi k}`,
//! where `t_m = m * hop / sample_rate`. The phase term is a pure delay of
//! N/2 samples, so a frame's filter response sits centered in the frame.
//! Frames are filtered independently of one another.

use std::borrow::Cow;
use std::f64::consts::PI;

use log::debug;
use rustfft::num_complex::Complex;

use crate::curve::FilterCurve;
use crate::error::{DspError, DspResult};
use crate::transform::{FrameSequence, TransformConfig};

/// Supplies the filter curve in effect at a point in time.
///
/// Implementations should be cheap and free of side effects; the filter calls
/// them once per frame.
pub trait CurveSchedule {
    /// Curve for the frame starting at `time_s` seconds.
    fn curve_at(&self, time_s: f64) -> DspResult<Cow<'_, FilterCurve>>;
}

/// A fixed curve applies to every frame.
impl CurveSchedule for FilterCurve {
    fn curve_at(&self, _time_s: f64) -> DspResult<Cow<'_, FilterCurve>> {
        Ok(Cow::Borrowed(self))
    }
}

impl<S: CurveSchedule + ?Sized> CurveSchedule for &S {
    fn curve_at(&self, time_s: f64) -> DspResult<Cow<'_, FilterCurve>> {
        (**self).curve_at(time_s)
    }
}

impl<S: CurveSchedule + ?Sized> CurveSchedule for Box<S> {
    fn curve_at(&self, time_s: f64) -> DspResult<Cow<'_, FilterCurve>> {
        (**self).curve_at(time_s)
    }
}

/// Adapts a function `time_s -> curve` into a [`CurveSchedule`].
#[derive(Debug, Clone, Copy)]
pub struct FnSchedule<F>(pub F);

impl<F> CurveSchedule for FnSchedule<F>
where
    F: Fn(f64) -> DspResult<FilterCurve>,
{
    fn curve_at(&self, time_s: f64) -> DspResult<Cow<'_, FilterCurve>> {
        (self.0)(time_s).map(Cow::Owned)
    }
}

/// Phase of a pure N/2-sample delay for bins `0..=N/2`: `phi[k] = -pi k`.
pub fn linear_phase(config: &TransformConfig) -> Vec<f64> {
    (0..config.num_bins()).map(|k| -PI * k as f64).collect()
}

/// Applies a scheduled, linear-phase magnitude response to STFT frames.
#[derive(Debug, Clone)]
pub struct TimeVaryingFilter<S> {
    config: TransformConfig,
    schedule: S,
    bin_freqs: Vec<f64>,
    phasors: Vec<Complex<f64>>,
}

impl<S: CurveSchedule> TimeVaryingFilter<S> {
    /// Creates a filter for frames produced with `config`.
    pub fn new(config: TransformConfig, schedule: S) -> Self {
        let phasors = linear_phase(&config)
            .into_iter()
            .map(|phi| Complex::from_polar(1.0, phi))
            .collect();
        Self {
            config,
            schedule,
            bin_freqs: config.bin_frequencies(),
            phasors,
        }
    }

    /// The transform configuration the filter was built for.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// The curve schedule.
    pub fn schedule(&self) -> &S {
        &self.schedule
    }

    /// The fixed phase response, one value per bin.
    pub fn linear_phase(&self) -> Vec<f64> {
        linear_phase(&self.config)
    }

    /// Curve magnitudes at every bin center.
    pub fn magnitudes_for_bins(&self, curve: &FilterCurve) -> Vec<f64> {
        curve.eval_mag_many(&self.bin_freqs)
    }

    /// Complex response `H[k]` for the frame starting at `time_s`.
    pub fn frame_response(&self, time_s: f64) -> DspResult<Vec<Complex<f64>>> {
        let curve = self.schedule.curve_at(time_s)?;
        let response = self
            .magnitudes_for_bins(&curve)
            .into_iter()
            .zip(self.phasors.iter())
            .map(|(mag, phasor)| *phasor * mag)
            .collect();
        Ok(response)
    }

    /// Multiplies every frame in place by its time-dependent response.
    ///
    /// # Errors
    /// Fails when the frames have the wrong bin count or the schedule cannot
    /// produce a curve.
    pub fn apply(&self, frames: &mut FrameSequence) -> DspResult<()> {
        if frames.bins_per_frame() != self.config.num_bins() {
            return Err(DspError::invalid_param(
                "frames",
                format!(
                    "frames have {} bins, filter expects {}",
                    frames.bins_per_frame(),
                    self.config.num_bins()
                ),
            ));
        }

        for (m, frame) in frames.frames_mut().iter_mut().enumerate() {
            let response = self.frame_response(self.config.frame_time(m))?;
            for (x, h) in frame.iter_mut().zip(response.iter()) {
                *x *= *h;
            }
        }

        debug!(
            "time-varying filter applied to {} frames ({} bins each)",
            frames.len(),
            frames.bins_per_frame()
        );
        Ok(())
    }

    /// Filters a copy of `frames`, leaving the input untouched.
    pub fn apply_to(&self, frames: &FrameSequence) -> DspResult<FrameSequence> {
        let mut filtered = frames.clone();
        self.apply(&mut filtered)?;
        Ok(filtered)
    }
}
