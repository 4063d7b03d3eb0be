//! noiseclick CLI library.
//!
//! Command implementations behind the `noiseclick` binary: rendering metronome
//! tracks and pulses, band sweeps, and printing presets.

pub mod commands;
