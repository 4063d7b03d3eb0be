//! noiseclick metronome renderer
//!
//! Turns seeded white noise into a metronome click track by filtering it with
//! a per-beat spectral band that flares at each onset and decays into a floor.
//! Accented beats use a brighter, narrower band than regular ones.
//!
//! # Pipeline
//!
//! ```text
//! white_noise -> STFT -> BeatSchedule filter -> ISTFT
//!     -> per-beat ADSR -> highpass -> soft clip -> normalize (0.9 peak)
//! ```
//!
//! The first accented and regular clicks can be cut out as standalone pulses,
//! trimmed where their decay falls below a threshold. A band sweep render is
//! included for listening tests of the filter itself.
//!
//! # Example
//!
//! ```no_run
//! use noiseclick_metronome::{render_pulses, MetronomePreset, WavResult};
//!
//! let preset = MetronomePreset::click();
//! let (track, pulses) = render_pulses(&preset, None)?;
//! WavResult::from_mono(&track.samples, track.sample_rate)?.write_to("metronome.wav")?;
//! WavResult::from_mono(&pulses.accent, pulses.sample_rate)?.write_to("pulse_accent.wav")?;
//! # Ok::<(), noiseclick_metronome::MetronomeError>(())
//! ```

pub mod envelope;
pub mod error;
pub mod noise;
pub mod post;
pub mod preset;
pub mod render;
pub mod schedule;
pub mod sweep;
pub mod wav;

pub use envelope::AdsrParams;
pub use error::{MetronomeError, MetronomeResult};
pub use preset::{BeatVoice, MetronomePreset, SweepConfig};
pub use render::{extract_pulses, render, render_pulses, Pulses, RenderedTrack};
pub use schedule::{BeatSchedule, SweepSchedule};
pub use sweep::{render_sweep, SignalStats};
pub use wav::WavResult;
