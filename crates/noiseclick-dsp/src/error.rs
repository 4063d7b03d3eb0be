//! Error types for the spectral core.

use thiserror::Error;

/// Result type for spectral core operations.
pub type DspResult<T> = Result<T, DspError>;

/// Configuration errors raised when constructing transforms, curves and filters.
///
/// Numeric degeneracies (tiny overlap-add normalization, non-positive
/// frequencies in log evaluation) never surface here; they are clamped where
/// they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DspError {
    /// Frame size is zero or odd.
    #[error("invalid frame size: {size} (must be even and greater than zero)")]
    InvalidFrameSize {
        /// The rejected frame size.
        size: usize,
    },

    /// Hop size outside `1..=frame_size`.
    #[error("invalid hop size: {hop} (must be in 1..={frame_size})")]
    InvalidHop {
        /// The rejected hop size.
        hop: usize,
        /// Frame size the hop was checked against.
        frame_size: usize,
    },

    /// Sample rate is zero or too low for the requested operation.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The rejected sample rate.
        rate: u32,
    },

    /// Filter curve control points violate the curve invariants.
    #[error("invalid filter curve: {message}")]
    InvalidCurve {
        /// What was wrong with the points.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl DspError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid curve error.
    pub fn invalid_curve(message: impl Into<String>) -> Self {
        Self::InvalidCurve {
            message: message.into(),
        }
    }

    /// Stable error code for reports and diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            DspError::InvalidFrameSize { .. } => "DSP_001",
            DspError::InvalidHop { .. } => "DSP_002",
            DspError::InvalidSampleRate { .. } => "DSP_003",
            DspError::InvalidCurve { .. } => "DSP_004",
            DspError::InvalidParameter { .. } => "DSP_005",
        }
    }
}
