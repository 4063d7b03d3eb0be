//! noiseclick spectral core
//!
//! Shapes broadband noise into percussive clicks with a time-varying,
//! linear-phase filter designed in log-frequency / decibel space, and measures
//! the decay tail of the result.
//!
//! # Pipeline
//!
//! ```text
//! noise -> Stft::forward -> TimeVaryingFilter::apply -> Stft::inverse -> measure_tail
//! ```
//!
//! All operations work on complete, finite buffers and are deterministic.
//! Configuration problems (odd frame size, bad hop, malformed curves) are
//! reported as [`DspError`] when objects are constructed; numeric edge cases
//! are clamped silently.
//!
//! # Example
//!
//! ```
//! use noiseclick_dsp::{curve, Stft, TimeVaryingFilter, TransformConfig};
//!
//! let config = TransformConfig::new(44100, 1024)?;
//! let stft = Stft::new(config);
//! let band = curve::raised_cosine(1000.0, 0.5, 20.0, -40.0, 44100, 256)?;
//! let filter = TimeVaryingFilter::new(config, band);
//!
//! let input = vec![0.0; 4410];
//! let mut frames = stft.forward(&input);
//! filter.apply(&mut frames)?;
//! let output = stft.inverse(&frames, Some(input.len()))?;
//! assert_eq!(output.len(), input.len());
//! # Ok::<(), noiseclick_dsp::DspError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`transform`] - STFT / overlap-add ISTFT
//! - [`curve`] - log-log filter curves and band builders
//! - [`filter`] - time-varying linear-phase filter and curve schedules
//! - [`tail`] - decay-tail measurement and pulse trimming
//! - [`util`] - decibel and spacing helpers

pub mod curve;
pub mod error;
pub mod filter;
pub mod tail;
pub mod transform;
pub mod util;

pub use rustfft::num_complex::Complex;

// Re-export main types at crate root
pub use curve::{BandShape, BandSpec, FilterCurve};
pub use error::{DspError, DspResult};
pub use filter::{CurveSchedule, FnSchedule, TimeVaryingFilter};
pub use tail::{measure_tail, trim_pulse, FadeConfig, TailConfig, TailMeasurement};
pub use transform::{FrameSequence, Stft, TransformConfig, OLA_EPSILON};
