//! Error types for metronome rendering.

use noiseclick_dsp::DspError;
use thiserror::Error;

/// Result type for metronome operations.
pub type MetronomeResult<T> = Result<T, MetronomeError>;

/// Errors that can occur while loading presets, rendering or writing audio.
#[derive(Debug, Error)]
pub enum MetronomeError {
    /// Spectral core configuration error.
    #[error(transparent)]
    Dsp(#[from] DspError),

    /// Preset field outside its valid range.
    #[error("invalid preset field '{name}': {message}")]
    InvalidPreset {
        /// Field name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Preset JSON could not be parsed.
    #[error("preset parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetronomeError {
    /// Creates an invalid preset error.
    pub fn invalid_preset(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPreset {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Stable error code for reports and diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            MetronomeError::Dsp(inner) => inner.code(),
            MetronomeError::InvalidPreset { .. } => "METRO_001",
            MetronomeError::Parse(_) => "METRO_002",
            MetronomeError::Io(_) => "METRO_003",
        }
    }
}
